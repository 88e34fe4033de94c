//! The media engine seam.
//!
//! The controller never touches audio output directly. It drives a
//! `MediaEngine` and learns about progress through `EngineEvent`s the engine
//! sends back on a channel.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use thiserror::Error;

use super::types::{EngineEvent, LoadId};

/// Channel an engine reports `EngineEvent`s on.
pub type EngineEvents = Sender<EngineEvent>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("unsupported source locator `{0}`")]
    UnsupportedLocator(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("no source loaded")]
    NotLoaded,
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Narrow interface over the platform audio primitive.
///
/// An engine holds at most one source. Every event it emits for that source
/// carries the `LoadId` passed to `load`.
pub trait MediaEngine {
    /// Replace the current source with `locator`, paused at the start.
    fn load(&mut self, load: LoadId, locator: &str) -> Result<(), EngineError>;
    /// Start or resume the loaded source.
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    /// Drop the current source; no further events are emitted for it.
    fn unload(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;
    /// `volume` is already clamped to `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);
}
