//! `MediaEngine` backed by `rodio` on the default output device.
//!
//! The output stream and the command methods live on the controller's
//! thread. A ticker thread watches the active sink and reports position and
//! end-of-track on the engine event channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, trace, warn};

use super::engine::{EngineError, EngineEvents, MediaEngine};
use super::sink::{create_sink, resolve_locator};
use super::types::{EngineEvent, LoadId};

struct ActiveSource {
    load: LoadId,
    sink: Sink,
    ended: bool,
}

type SharedSource = Arc<Mutex<Option<ActiveSource>>>;

pub struct RodioEngine {
    stream: OutputStream,
    active: SharedSource,
    events: EngineEvents,
    volume: f32,
    shutdown: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Open the default output device and start reporting every `tick`.
    pub fn new(events: EngineEvents, tick: Duration) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // interleave with the command shell.
        stream.log_on_drop(false);

        let active: SharedSource = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));
        let ticker = spawn_ticker(active.clone(), events.clone(), tick, shutdown.clone())
            .map_err(|e| EngineError::Output(format!("failed to spawn ticker: {e}")))?;

        Ok(Self {
            stream,
            active,
            events,
            volume: 1.0,
            shutdown,
            ticker: Some(ticker),
        })
    }

    fn with_active<R>(&self, f: impl FnOnce(&mut ActiveSource) -> R) -> Option<R> {
        let mut guard = self.active.lock().ok()?;
        guard.as_mut().map(f)
    }
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, load: LoadId, locator: &str) -> Result<(), EngineError> {
        self.unload();

        let path = resolve_locator(locator)?;
        let (sink, duration) = create_sink(self.stream.mixer(), &path)?;
        sink.set_volume(self.volume);
        debug!(path = %path.display(), ?duration, "source loaded");

        if let Ok(mut guard) = self.active.lock() {
            *guard = Some(ActiveSource {
                load,
                sink,
                ended: false,
            });
        }
        if let Some(duration) = duration {
            let _ = self.events.send(EngineEvent::MetadataLoaded { load, duration });
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.with_active(|src| src.sink.play())
            .ok_or(EngineError::NotLoaded)
    }

    fn pause(&mut self) {
        self.with_active(|src| src.sink.pause());
    }

    fn unload(&mut self) {
        if let Ok(mut guard) = self.active.lock() {
            if let Some(src) = guard.take() {
                src.sink.stop();
                trace!(load = ?src.load, "source unloaded");
            }
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.with_active(|src| {
            src.sink
                .try_seek(position)
                .map_err(|e| EngineError::Seek(e.to_string()))?;
            src.ended = false;
            Ok(())
        })
        .ok_or(EngineError::NotLoaded)?
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.with_active(|src| src.sink.set_volume(volume));
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.unload();
        if let Some(handle) = self.ticker.take() {
            if handle.join().is_err() {
                warn!("engine ticker panicked");
            }
        }
    }
}

fn spawn_ticker(
    active: SharedSource,
    events: EngineEvents,
    tick: Duration,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("engine-ticker".into())
        .spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(tick);

                let event = {
                    let Ok(mut guard) = active.lock() else {
                        break;
                    };
                    let Some(src) = guard.as_mut() else {
                        continue;
                    };
                    if src.ended || src.sink.is_paused() {
                        continue;
                    }
                    if src.sink.empty() {
                        src.ended = true;
                        EngineEvent::Ended { load: src.load }
                    } else {
                        EngineEvent::TimeUpdate {
                            load: src.load,
                            position: src.sink.get_pos(),
                        }
                    }
                };

                if events.send(event).is_err() {
                    // Nobody is listening anymore.
                    break;
                }
            }
        })
}
