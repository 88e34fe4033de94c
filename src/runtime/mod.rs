use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::audio::{EngineError, PlaybackController, RodioEngine};
use crate::library::{CatalogError, load_library};
use crate::logging;

mod commands;
mod event_loop;
mod report;
mod settings;
mod startup;

use commands::ControlCmd;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub fn run() -> Result<(), RuntimeError> {
    let (settings, settings_problem) = settings::load_settings();
    logging::init(&settings.log).map_err(|e| RuntimeError::Logging(e.to_string()))?;
    if let Some(e) = settings_problem {
        warn!("config not applied, using defaults: {e}");
    }

    let location = startup::library_location(env::args().nth(1), &settings.library);
    let tracks = load_library(&location, &settings.library)?;
    info!(location = %location.display(), count = tracks.len(), "library ready");

    let (engine_tx, engine_rx) = mpsc::channel();
    let engine = RodioEngine::new(engine_tx, Duration::from_millis(settings.audio.tick_ms))?;

    // The one playback session for the lifetime of the process.
    let mut controller = PlaybackController::new(engine, settings.audio.initial_volume);
    let updates = controller.subscribe();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    spawn_stdin_reader(control_tx)?;

    println!(
        "{} tracks from {}. Type `list` to browse, `help` for commands.",
        tracks.len(),
        location.display()
    );

    event_loop::run(
        &mut controller,
        &tracks,
        &settings,
        &control_rx,
        &engine_rx,
        &updates,
    )?;

    info!("bye");
    Ok(())
}

/// Read commands from stdin on a background thread. EOF counts as `quit`.
fn spawn_stdin_reader(tx: Sender<ControlCmd>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ControlCmd>() {
                    Ok(cmd) => {
                        let quit = cmd == ControlCmd::Quit;
                        if tx.send(cmd).is_err() || quit {
                            return;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            let _ = tx.send(ControlCmd::Quit);
        })
}
