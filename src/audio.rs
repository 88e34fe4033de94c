//! Playback: the controller, its engine seam and the rodio-backed engine.

mod controller;
mod engine;
mod observers;
mod queue;
mod rodio_engine;
mod sink;
mod types;

pub use controller::PlaybackController;
pub use engine::{EngineError, MediaEngine};
pub use rodio_engine::RodioEngine;
pub use types::{EngineEvent, LoadId, PlaybackEvent, PlaybackSnapshot, TransportState};

#[cfg(test)]
mod tests;
