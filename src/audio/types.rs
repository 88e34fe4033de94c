//! Audio-related small types.
//!
//! This module defines the transport state, the engine event contract and
//! the snapshots published to observers.

use std::sync::Arc;
use std::time::Duration;

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No track loaded.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Identifies one source load. Engine events tagged with an older id belong
/// to a source that has since been replaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadId(u64);

impl LoadId {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Callbacks emitted by a media engine for the source loaded under `load`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playback head moved.
    TimeUpdate { load: LoadId, position: Duration },
    /// Total length of the source became known.
    MetadataLoaded { load: LoadId, duration: Duration },
    /// The source played to completion.
    Ended { load: LoadId },
}

impl EngineEvent {
    pub fn load(&self) -> LoadId {
        match *self {
            EngineEvent::TimeUpdate { load, .. }
            | EngineEvent::MetadataLoaded { load, .. }
            | EngineEvent::Ended { load } => load,
        }
    }
}

#[derive(Debug, Clone)]
/// Read-only view of the playback session handed to observers.
pub struct PlaybackSnapshot {
    pub track: Option<Track>,
    pub queue: Arc<[Track]>,
    pub transport: TransportState,
    /// Elapsed playback time of `track`.
    pub position: Duration,
    /// Total length of `track`; zero until the engine reports it.
    pub duration: Duration,
    pub volume: f32,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            track: None,
            queue: Arc::from(Vec::new()),
            transport: TransportState::Idle,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
        }
    }
}

/// A state transition of the playback session, with the state it led to.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// A new queue replaced the previous one.
    QueueReplaced(PlaybackSnapshot),
    /// A track was loaded and started from the beginning.
    TrackStarted(PlaybackSnapshot),
    /// A track was selected but the engine could not start it.
    StartFailed(PlaybackSnapshot),
    Paused(PlaybackSnapshot),
    Resumed(PlaybackSnapshot),
    /// The current track went back to position zero.
    Restarted(PlaybackSnapshot),
    Stopped(PlaybackSnapshot),
    Seeked(PlaybackSnapshot),
    VolumeChanged(PlaybackSnapshot),
    PositionChanged(PlaybackSnapshot),
    DurationKnown(PlaybackSnapshot),
}

impl PlaybackEvent {
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        match self {
            PlaybackEvent::QueueReplaced(s)
            | PlaybackEvent::TrackStarted(s)
            | PlaybackEvent::StartFailed(s)
            | PlaybackEvent::Paused(s)
            | PlaybackEvent::Resumed(s)
            | PlaybackEvent::Restarted(s)
            | PlaybackEvent::Stopped(s)
            | PlaybackEvent::Seeked(s)
            | PlaybackEvent::VolumeChanged(s)
            | PlaybackEvent::PositionChanged(s)
            | PlaybackEvent::DurationKnown(s) => s,
        }
    }
}
