//! Text rendering of playback state for the shell.

use std::time::Duration;

use crate::audio::{PlaybackEvent, PlaybackSnapshot, TransportState};
use crate::library::Track;

/// Format a `Duration` as `MM:SS`.
pub(super) fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn transport_label(t: TransportState) -> &'static str {
    match t {
        TransportState::Idle => "stopped",
        TransportState::Playing => "playing",
        TransportState::Paused => "paused",
    }
}

fn queue_position(snapshot: &PlaybackSnapshot, track: &Track) -> Option<String> {
    let pos = snapshot.queue.iter().position(|t| t == track)?;
    Some(format!("{}/{}", pos + 1, snapshot.queue.len()))
}

/// One-line summary: transport, track, time and volume.
pub(super) fn status_line(snapshot: &PlaybackSnapshot) -> String {
    let volume = format!("vol {:.0}%", snapshot.volume * 100.0);
    let Some(track) = snapshot.track.as_ref() else {
        return format!("[{}] {}", transport_label(snapshot.transport), volume);
    };

    let total = if snapshot.duration.is_zero() {
        "--:--".to_string()
    } else {
        format_mmss(snapshot.duration)
    };
    let mut line = format!(
        "[{}] {}  {} / {}  {}",
        transport_label(snapshot.transport),
        track.display(),
        format_mmss(snapshot.position),
        total,
        volume
    );
    if let Some(pos) = queue_position(snapshot, track) {
        line.push_str(&format!("  ({pos})"));
    }
    line
}

/// Line printed for an event, or `None` for high-frequency position ticks.
pub(super) fn describe(event: &PlaybackEvent) -> Option<String> {
    let s = event.snapshot();
    let title = || s.track.as_ref().map(Track::display).unwrap_or_default();
    let line = match event {
        PlaybackEvent::QueueReplaced(_) => format!("queue: {} tracks", s.queue.len()),
        PlaybackEvent::TrackStarted(_) => {
            let cover = s.track.as_ref().and_then(|t| t.cover.as_deref());
            match cover {
                Some(cover) => format!("> {}  [cover {}]", title(), cover),
                None => format!("> {}", title()),
            }
        }
        PlaybackEvent::StartFailed(_) => format!("! could not play {}", title()),
        PlaybackEvent::Paused(_) => format!("|| paused at {}", format_mmss(s.position)),
        PlaybackEvent::Resumed(_) => format!("> resumed at {}", format_mmss(s.position)),
        PlaybackEvent::Restarted(_) => format!("<< restarted {}", title()),
        PlaybackEvent::Stopped(_) => "[] stopped".to_string(),
        PlaybackEvent::Seeked(_) if s.is_playing() => format!("-> {}", format_mmss(s.position)),
        PlaybackEvent::Seeked(_) => format!("-> {} (paused)", format_mmss(s.position)),
        PlaybackEvent::VolumeChanged(_) => format!("vol {:.0}%", s.volume * 100.0),
        PlaybackEvent::DurationKnown(_) => format!("length {}", format_mmss(s.duration)),
        PlaybackEvent::PositionChanged(_) => return None,
    };
    Some(line)
}

pub(super) fn help_text(seek_step: u64) -> String {
    let rows = [
        ("list", "show the library".to_string()),
        ("queue", "show the play queue".to_string()),
        ("play <n|id>", "play a track, library as queue".to_string()),
        ("p / toggle", "play/pause".to_string()),
        ("pause", "pause".to_string()),
        ("stop", "stop playback".to_string()),
        ("n / next", "next track".to_string()),
        ("b / prev", "previous track or restart".to_string()),
        ("seek <s>", "jump to second".to_string()),
        ("ff / rw [s]", format!("skip +/-{seek_step}s by default")),
        ("vol <0..1>", "set volume".to_string()),
        ("vol+ / vol-", "nudge volume".to_string()),
        ("s / status", "show what is playing".to_string()),
        ("q / quit", "quit".to_string()),
    ];
    rows.iter()
        .map(|(k, v)| format!("  {k:<14} {v}"))
        .collect::<Vec<String>>()
        .join("\n")
}
