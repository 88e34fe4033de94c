//! The playback controller: single owner of what is playing and where.
//!
//! Commands come from the runtime, engine callbacks arrive as
//! `EngineEvent`s, and every transition is published to observers as a
//! `PlaybackEvent` carrying a fresh snapshot. Everything runs on the thread
//! that owns the controller.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::library::Track;

use super::engine::MediaEngine;
use super::observers::Observers;
use super::queue::{next_after, previous_before, same_order};
use super::types::{EngineEvent, LoadId, PlaybackEvent, PlaybackSnapshot, TransportState};

pub struct PlaybackController<E: MediaEngine> {
    engine: E,
    track: Option<Track>,
    queue: Arc<[Track]>,
    transport: TransportState,
    position: Duration,
    duration: Duration,
    volume: f32,
    /// Id of the source currently in the engine; events for any other id are stale.
    load: LoadId,
    /// Whether the engine holds a source for `track`.
    loaded: bool,
    observers: Observers,
}

impl<E: MediaEngine> PlaybackController<E> {
    pub fn new(mut engine: E, initial_volume: f32) -> Self {
        let volume = if initial_volume.is_nan() {
            1.0
        } else {
            initial_volume.clamp(0.0, 1.0)
        };
        engine.set_volume(volume);

        Self {
            engine,
            track: None,
            queue: Arc::from(Vec::new()),
            transport: TransportState::Idle,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            load: LoadId::default(),
            loaded: false,
            observers: Observers::default(),
        }
    }

    /// Register an observer. Every later transition is delivered on the receiver.
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        self.observers.subscribe()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            track: self.track.clone(),
            queue: Arc::clone(&self.queue),
            transport: self.transport,
            position: self.position,
            duration: self.duration,
            volume: self.volume,
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }

    pub fn current_time(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Play `track`, making `queue` the playback context unless it is empty.
    ///
    /// Selecting the track that is already loaded, without a different
    /// queue, toggles between playing and paused instead of restarting it.
    pub fn play(&mut self, track: Track, queue: Vec<Track>) {
        let replaces_queue = !queue.is_empty() && !same_order(&queue, &self.queue);

        if !replaces_queue && self.loaded && self.track.as_ref() == Some(&track) {
            self.toggle_play();
            return;
        }

        if replaces_queue {
            debug!(len = queue.len(), "queue replaced");
            self.queue = Arc::from(queue);
            self.emit(PlaybackEvent::QueueReplaced);
        }
        self.start(track);
    }

    pub fn toggle_play(&mut self) {
        match self.transport {
            TransportState::Idle => trace!("toggle ignored: nothing loaded"),
            TransportState::Playing => self.pause(),
            TransportState::Paused => self.resume(),
        }
    }

    pub fn pause(&mut self) {
        if self.transport != TransportState::Playing {
            return;
        }
        self.engine.pause();
        self.transport = TransportState::Paused;
        self.emit(PlaybackEvent::Paused);
    }

    /// Drop the current track and go idle. The queue is kept.
    pub fn stop(&mut self) {
        if self.transport == TransportState::Idle && self.track.is_none() {
            return;
        }
        self.engine.unload();
        self.load = self.load.next();
        self.loaded = false;
        self.track = None;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.transport = TransportState::Idle;
        debug!("playback stopped");
        self.emit(PlaybackEvent::Stopped);
    }

    /// Move to the next queue entry. At the end of the queue, or when the
    /// current track is not part of it, playback stops.
    pub fn advance(&mut self) {
        let next = self
            .track
            .as_ref()
            .and_then(|current| next_after(&self.queue, current))
            .cloned();

        match next {
            Some(track) => self.start(track),
            None => self.stop(),
        }
    }

    /// Move to the previous queue entry, or restart the current track when
    /// there is none before it.
    pub fn retreat(&mut self) {
        let Some(current) = self.track.as_ref() else {
            return;
        };

        match previous_before(&self.queue, current).cloned() {
            Some(track) => self.start(track),
            None => self.restart(),
        }
    }

    /// Move the playback head to `target_secs`, clamped to `[0, duration]`.
    pub fn seek(&mut self, target_secs: f64) {
        if self.track.is_none() {
            return;
        }
        if target_secs.is_nan() {
            warn!("seek target is not a number; ignored");
            return;
        }

        let secs = target_secs.clamp(0.0, self.duration.as_secs_f64());
        let target = Duration::from_secs_f64(secs);
        match self.engine.seek(target) {
            Ok(()) => {
                self.position = target;
                self.emit(PlaybackEvent::Seeked);
            }
            Err(e) => warn!("seek to {secs:.1}s failed: {e}"),
        }
    }

    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek(self.position.as_secs_f64() + delta_secs);
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("volume is not a number; ignored");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.engine.set_volume(volume);
        self.volume = volume;
        self.emit(PlaybackEvent::VolumeChanged);
    }

    /// Apply a callback from the engine. Events for replaced sources are dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if event.load() != self.load || self.track.is_none() {
            trace!(?event, "stale engine event dropped");
            return;
        }

        match event {
            EngineEvent::TimeUpdate { position, .. } => {
                self.position = self.clamp_to_duration(position);
                self.emit(PlaybackEvent::PositionChanged);
            }
            EngineEvent::MetadataLoaded { duration, .. } => {
                self.duration = duration;
                self.position = self.clamp_to_duration(self.position);
                self.emit(PlaybackEvent::DurationKnown);
            }
            EngineEvent::Ended { .. } => {
                debug!("track ended");
                self.advance();
            }
        }
    }

    fn start(&mut self, track: Track) {
        self.load = self.load.next();
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;

        debug!(track = %track.id, source = %track.source, "loading track");
        let loaded = self.engine.load(self.load, &track.source);
        self.loaded = loaded.is_ok();
        let started = loaded.and_then(|()| self.engine.play());
        self.track = Some(track);

        match started {
            Ok(()) => {
                self.transport = TransportState::Playing;
                self.emit(PlaybackEvent::TrackStarted);
            }
            Err(e) => {
                warn!("playback failed to start: {e}");
                self.transport = TransportState::Paused;
                self.emit(PlaybackEvent::StartFailed);
            }
        }
    }

    fn resume(&mut self) {
        if !self.loaded {
            // An earlier load failed; try the source again from the start.
            if let Some(track) = self.track.clone() {
                self.start(track);
            }
            return;
        }
        match self.engine.play() {
            Ok(()) => {
                self.transport = TransportState::Playing;
                self.emit(PlaybackEvent::Resumed);
            }
            Err(e) => warn!("playback failed to resume: {e}"),
        }
    }

    fn restart(&mut self) {
        match self.engine.seek(Duration::ZERO) {
            Ok(()) => {
                self.position = Duration::ZERO;
                self.emit(PlaybackEvent::Restarted);
            }
            Err(e) => warn!("restart failed: {e}"),
        }
    }

    /// Positions are only bounded once the duration is known.
    fn clamp_to_duration(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    fn emit(&mut self, event: fn(PlaybackSnapshot) -> PlaybackEvent) {
        let snapshot = self.snapshot();
        self.observers.publish(event(snapshot));
    }
}
