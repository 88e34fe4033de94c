use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::debug;

use crate::audio::{EngineEvent, MediaEngine, PlaybackController, PlaybackEvent, TransportState};
use crate::config::Settings;
use crate::library::{Track, display_from_fields};

use super::commands::{ControlCmd, Selector};
use super::report::{describe, help_text, status_line};

/// How long to wait for a command before draining engine events again.
const COMMAND_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main loop: applies commands, feeds engine callbacks to the controller
/// and prints playback events. Returns when a quit is requested or the
/// command channel closes.
pub fn run<E: MediaEngine>(
    controller: &mut PlaybackController<E>,
    tracks: &[Track],
    settings: &Settings,
    control_rx: &Receiver<ControlCmd>,
    engine_rx: &Receiver<EngineEvent>,
    updates: &Receiver<PlaybackEvent>,
) -> io::Result<()> {
    let stdout = io::stdout();
    loop {
        match control_rx.recv_timeout(COMMAND_POLL) {
            Ok(cmd) => {
                debug!(?cmd, "command");
                let flow = handle_command(cmd, controller, tracks, settings, &mut stdout.lock())?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for event in engine_rx.try_iter() {
            controller.handle_engine_event(event);
        }
        report_updates(updates, &mut stdout.lock())?;
    }

    if controller.transport() != TransportState::Idle {
        controller.stop();
    }
    Ok(())
}

pub fn report_updates(updates: &Receiver<PlaybackEvent>, out: &mut impl Write) -> io::Result<()> {
    for event in updates.try_iter() {
        if let Some(line) = describe(&event) {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()
}

fn find_track<'a>(tracks: &'a [Track], selector: &Selector) -> Option<&'a Track> {
    match selector {
        Selector::Index(n) => n.checked_sub(1).and_then(|i| tracks.get(i)),
        Selector::Id(id) => tracks.iter().find(|t| t.id.as_str() == id),
    }
}

fn log_position<E: MediaEngine>(controller: &PlaybackController<E>) {
    debug!(
        position = ?controller.current_time(),
        duration = ?controller.duration(),
        "seek applied"
    );
}

pub fn handle_command<E: MediaEngine>(
    cmd: ControlCmd,
    controller: &mut PlaybackController<E>,
    tracks: &[Track],
    settings: &Settings,
    out: &mut impl Write,
) -> io::Result<Flow> {
    let seek_step = settings.controls.seek_step_seconds as f64;
    let volume_step = settings.controls.volume_step;

    match cmd {
        ControlCmd::List => {
            let current = controller.current_track();
            for (i, track) in tracks.iter().enumerate() {
                let marker = if current == Some(track) { '*' } else { ' ' };
                let line = display_from_fields(
                    track,
                    &settings.library.display_fields,
                    &settings.library.display_separator,
                );
                writeln!(out, "{marker}{:>4}  {line}", i + 1)?;
            }
        }
        ControlCmd::Queue => {
            let current = controller.current_track();
            let queue = controller.queue();
            if queue.is_empty() {
                writeln!(out, "queue is empty")?;
            }
            for (i, track) in queue.iter().enumerate() {
                let marker = match current {
                    Some(c) if c == track && controller.is_playing() => '>',
                    Some(c) if c == track => '*',
                    _ => ' ',
                };
                writeln!(out, "{marker}{:>4}  {}", i + 1, track.display())?;
            }
        }
        ControlCmd::Play(selector) => match find_track(tracks, &selector) {
            Some(track) => controller.play(track.clone(), tracks.to_vec()),
            None => writeln!(out, "no such track: {selector:?}")?,
        },
        ControlCmd::Toggle => controller.toggle_play(),
        ControlCmd::Pause => controller.pause(),
        ControlCmd::Stop => controller.stop(),
        ControlCmd::Next => controller.advance(),
        ControlCmd::Prev => controller.retreat(),
        ControlCmd::Seek(secs) => {
            controller.seek(secs);
            log_position(controller);
        }
        ControlCmd::Forward(secs) => {
            controller.seek_by(secs.unwrap_or(seek_step));
            log_position(controller);
        }
        ControlCmd::Rewind(secs) => {
            controller.seek_by(-secs.unwrap_or(seek_step));
            log_position(controller);
        }
        ControlCmd::Volume(v) => controller.set_volume(v),
        ControlCmd::VolumeUp => controller.set_volume(controller.volume() + volume_step),
        ControlCmd::VolumeDown => controller.set_volume(controller.volume() - volume_step),
        ControlCmd::Status => writeln!(out, "{}", status_line(&controller.snapshot()))?,
        ControlCmd::Help => writeln!(out, "{}", help_text(settings.controls.seek_step_seconds))?,
        ControlCmd::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
