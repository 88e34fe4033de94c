use std::sync::mpsc::Receiver;
use std::time::Duration;

use super::controller::PlaybackController;
use super::engine::{EngineError, MediaEngine};
use super::queue::{next_after, previous_before, same_order};
use super::types::{EngineEvent, LoadId, PlaybackEvent, TransportState};
use crate::library::{Track, TrackId};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Unload,
    Seek(Duration),
    Volume(f32),
}

/// Records every command and plays nothing.
#[derive(Debug, Default)]
struct FakeEngine {
    calls: Vec<Call>,
    loaded: Option<LoadId>,
    last_load: LoadId,
    broken_sources: Vec<String>,
    refuse_play: bool,
}

impl MediaEngine for FakeEngine {
    fn load(&mut self, load: LoadId, locator: &str) -> Result<(), EngineError> {
        self.calls.push(Call::Load(locator.to_string()));
        self.loaded = None;
        self.last_load = load;
        if self.broken_sources.iter().any(|s| s == locator) {
            return Err(EngineError::Decode {
                path: locator.into(),
                reason: "corrupt frame".into(),
            });
        }
        self.loaded = Some(load);
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Play);
        if self.refuse_play || self.loaded.is_none() {
            return Err(EngineError::NotLoaded);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn unload(&mut self) {
        self.calls.push(Call::Unload);
        self.loaded = None;
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.calls.push(Call::Seek(position));
        self.loaded.map(|_| ()).ok_or(EngineError::NotLoaded)
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
    }
}

fn t(id: &str) -> Track {
    Track {
        id: TrackId::new(id),
        title: id.to_uppercase(),
        artist: "Artist".into(),
        cover: None,
        source: format!("/music/{id}.mp3"),
        genre: None,
    }
}

fn abc() -> Vec<Track> {
    vec![t("a"), t("b"), t("c")]
}

fn controller() -> PlaybackController<FakeEngine> {
    PlaybackController::new(FakeEngine::default(), 1.0)
}

fn current_id(ctl: &PlaybackController<FakeEngine>) -> Option<&str> {
    ctl.current_track().map(|t| t.id.as_str())
}

/// Report `duration` for whatever the engine loaded last.
fn metadata(ctl: &mut PlaybackController<FakeEngine>, secs: u64) {
    let load = ctl.engine().last_load;
    ctl.handle_engine_event(EngineEvent::MetadataLoaded {
        load,
        duration: Duration::from_secs(secs),
    });
}

fn tick(ctl: &mut PlaybackController<FakeEngine>, secs: u64) {
    let load = ctl.engine().last_load;
    ctl.handle_engine_event(EngineEvent::TimeUpdate {
        load,
        position: Duration::from_secs(secs),
    });
}

fn drain(rx: &Receiver<PlaybackEvent>) -> Vec<PlaybackEvent> {
    rx.try_iter().collect()
}

#[test]
fn play_from_idle_starts_at_zero() {
    let mut ctl = controller();
    assert_eq!(ctl.transport(), TransportState::Idle);

    ctl.play(t("a"), Vec::new());

    assert!(ctl.is_playing());
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.duration(), Duration::ZERO);
    assert_eq!(
        ctl.engine().calls[1..],
        [Call::Load("/music/a.mp3".into()), Call::Play]
    );
}

#[test]
fn playing_the_same_track_twice_toggles() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    ctl.play(t("a"), Vec::new());

    assert_eq!(ctl.transport(), TransportState::Paused);
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.engine().calls.last(), Some(&Call::Pause));

    ctl.play(t("a"), Vec::new());
    assert!(ctl.is_playing());
    let loads = ctl
        .engine()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Load(_)))
        .count();
    assert_eq!(loads, 1);
}

#[test]
fn same_track_with_identical_queue_still_toggles() {
    let mut ctl = controller();
    ctl.play(t("b"), abc());
    ctl.play(t("b"), abc());
    assert_eq!(ctl.transport(), TransportState::Paused);
}

#[test]
fn same_track_with_new_queue_restarts_in_that_context() {
    let mut ctl = controller();
    ctl.play(t("b"), abc());
    tick(&mut ctl, 30);

    ctl.play(t("b"), vec![t("b"), t("d")]);

    assert!(ctl.is_playing());
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.queue().len(), 2);
    ctl.advance();
    assert_eq!(current_id(&ctl), Some("d"));
}

#[test]
fn play_without_queue_keeps_previous_queue() {
    let mut ctl = controller();
    ctl.play(t("a"), abc());
    ctl.play(t("c"), Vec::new());

    assert_eq!(ctl.queue().len(), 3);
    ctl.retreat();
    assert_eq!(current_id(&ctl), Some("b"));
}

#[test]
fn toggle_and_pause_do_nothing_when_idle() {
    let mut ctl = controller();
    ctl.toggle_play();
    ctl.pause();
    assert_eq!(ctl.transport(), TransportState::Idle);
    assert_eq!(ctl.engine().calls, vec![Call::Volume(1.0)]);
}

#[test]
fn pause_is_idempotent() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    tick(&mut ctl, 12);

    ctl.pause();
    ctl.pause();

    assert_eq!(ctl.transport(), TransportState::Paused);
    assert_eq!(ctl.current_time(), Duration::from_secs(12));
    let pauses = ctl
        .engine()
        .calls
        .iter()
        .filter(|c| **c == Call::Pause)
        .count();
    assert_eq!(pauses, 1);
}

#[test]
fn toggle_keeps_track_and_position() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 200);
    tick(&mut ctl, 42);

    ctl.toggle_play();
    assert_eq!(ctl.transport(), TransportState::Paused);
    ctl.toggle_play();
    assert_eq!(ctl.transport(), TransportState::Playing);
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.current_time(), Duration::from_secs(42));
}

#[test]
fn seek_clamps_into_known_duration() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 180);

    ctl.seek(-5.0);
    assert_eq!(ctl.current_time(), Duration::ZERO);

    ctl.seek(10_000.0);
    assert_eq!(ctl.current_time(), Duration::from_secs(180));

    ctl.seek(f64::INFINITY);
    assert_eq!(ctl.current_time(), Duration::from_secs(180));

    ctl.seek(f64::NEG_INFINITY);
    assert_eq!(ctl.current_time(), Duration::ZERO);

    ctl.seek(61.5);
    assert_eq!(ctl.current_time(), Duration::from_millis(61_500));
    assert!(ctl.is_playing());
}

#[test]
fn seek_before_metadata_stays_at_zero() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    ctl.seek(30.0);
    assert_eq!(ctl.current_time(), Duration::ZERO);
}

#[test]
fn seek_ignores_nan_and_idle() {
    let mut ctl = controller();
    ctl.seek(10.0);
    assert!(!ctl.engine().calls.iter().any(|c| matches!(c, Call::Seek(_))));

    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 100);
    ctl.seek(20.0);
    ctl.seek(f64::NAN);
    assert_eq!(ctl.current_time(), Duration::from_secs(20));
}

#[test]
fn seek_does_not_change_transport() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 100);
    ctl.pause();
    ctl.seek(50.0);
    assert_eq!(ctl.transport(), TransportState::Paused);
}

#[test]
fn seek_by_moves_relative_to_position() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 100);
    tick(&mut ctl, 40);

    ctl.seek_by(5.0);
    assert_eq!(ctl.current_time(), Duration::from_secs(45));
    ctl.seek_by(-90.0);
    assert_eq!(ctl.current_time(), Duration::ZERO);
}

#[test]
fn set_volume_clamps_and_reaches_engine() {
    let mut ctl = controller();

    ctl.set_volume(1.7);
    assert_eq!(ctl.volume(), 1.0);
    ctl.set_volume(-0.3);
    assert_eq!(ctl.volume(), 0.0);
    ctl.set_volume(0.25);
    assert_eq!(ctl.volume(), 0.25);
    ctl.set_volume(f32::NAN);
    assert_eq!(ctl.volume(), 0.25);

    assert_eq!(ctl.engine().calls.last(), Some(&Call::Volume(0.25)));
}

#[test]
fn initial_volume_is_clamped() {
    let ctl = PlaybackController::new(FakeEngine::default(), 3.0);
    assert_eq!(ctl.volume(), 1.0);
    assert_eq!(ctl.engine().calls, vec![Call::Volume(1.0)]);
}

#[test]
fn advance_walks_queue_then_stops_at_end() {
    let mut ctl = controller();
    ctl.play(t("b"), abc());
    tick(&mut ctl, 17);

    ctl.advance();
    assert_eq!(current_id(&ctl), Some("c"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert!(ctl.is_playing());

    ctl.advance();
    assert_eq!(ctl.transport(), TransportState::Idle);
    assert!(ctl.current_track().is_none());
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.engine().calls.last(), Some(&Call::Unload));
    // The queue survives so a new selection can resume navigation.
    assert_eq!(ctl.queue().len(), 3);
}

#[test]
fn advance_stops_when_track_not_in_queue() {
    let mut ctl = controller();
    ctl.play(t("b"), vec![t("b"), t("c")]);
    ctl.play(t("a"), Vec::new());

    ctl.advance();
    assert_eq!(ctl.transport(), TransportState::Idle);
    assert!(ctl.current_track().is_none());
}

#[test]
fn advance_with_empty_queue_stops() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    ctl.advance();
    assert_eq!(ctl.transport(), TransportState::Idle);
}

#[test]
fn advance_when_idle_is_a_no_op() {
    let mut ctl = controller();
    let rx = ctl.subscribe();
    ctl.advance();
    assert!(drain(&rx).is_empty());
}

#[test]
fn retreat_walks_back_then_restarts_first() {
    let mut ctl = controller();
    ctl.play(t("b"), abc());
    metadata(&mut ctl, 100);
    tick(&mut ctl, 20);

    ctl.retreat();
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.duration(), Duration::ZERO);

    metadata(&mut ctl, 100);
    tick(&mut ctl, 33);
    ctl.retreat();
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.duration(), Duration::from_secs(100));
    assert_eq!(ctl.engine().calls.last(), Some(&Call::Seek(Duration::ZERO)));
    assert!(ctl.is_playing());
}

#[test]
fn retreat_with_empty_queue_restarts_current() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 100);
    tick(&mut ctl, 50);
    ctl.pause();

    ctl.retreat();
    assert_eq!(current_id(&ctl), Some("a"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.transport(), TransportState::Paused);
}

#[test]
fn retreat_when_idle_is_a_no_op() {
    let mut ctl = controller();
    ctl.retreat();
    assert_eq!(ctl.engine().calls, vec![Call::Volume(1.0)]);
}

#[test]
fn ended_event_advances() {
    let mut ctl = controller();
    ctl.play(t("a"), abc());
    let load = ctl.engine().last_load;

    ctl.handle_engine_event(EngineEvent::Ended { load });
    assert_eq!(current_id(&ctl), Some("b"));

    ctl.advance();
    let load = ctl.engine().last_load;
    ctl.handle_engine_event(EngineEvent::Ended { load });
    assert_eq!(ctl.transport(), TransportState::Idle);
}

#[test]
fn switching_tracks_resets_and_ignores_old_source() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    metadata(&mut ctl, 240);
    tick(&mut ctl, 90);
    let old = ctl.engine().last_load;

    ctl.play(t("b"), Vec::new());
    assert_eq!(current_id(&ctl), Some("b"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.duration(), Duration::ZERO);

    ctl.handle_engine_event(EngineEvent::TimeUpdate {
        load: old,
        position: Duration::from_secs(91),
    });
    ctl.handle_engine_event(EngineEvent::MetadataLoaded {
        load: old,
        duration: Duration::from_secs(240),
    });
    ctl.handle_engine_event(EngineEvent::Ended { load: old });

    assert_eq!(current_id(&ctl), Some("b"));
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.duration(), Duration::ZERO);
    assert!(ctl.is_playing());

    metadata(&mut ctl, 150);
    assert_eq!(ctl.duration(), Duration::from_secs(150));
}

#[test]
fn events_after_stop_are_ignored() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    let load = ctl.engine().last_load;
    ctl.stop();

    ctl.handle_engine_event(EngineEvent::TimeUpdate {
        load,
        position: Duration::from_secs(3),
    });
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert_eq!(ctl.transport(), TransportState::Idle);
}

#[test]
fn time_updates_clamp_once_duration_known() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());

    tick(&mut ctl, 400);
    assert_eq!(ctl.current_time(), Duration::from_secs(400));

    metadata(&mut ctl, 300);
    assert_eq!(ctl.current_time(), Duration::from_secs(300));

    tick(&mut ctl, 301);
    assert_eq!(ctl.current_time(), Duration::from_secs(300));
}

#[test]
fn failed_load_is_swallowed_and_not_playing() {
    let mut engine = FakeEngine::default();
    engine.broken_sources.push("/music/b.mp3".into());
    let mut ctl = PlaybackController::new(engine, 1.0);
    let rx = ctl.subscribe();

    ctl.play(t("a"), abc());
    ctl.advance();

    assert_eq!(current_id(&ctl), Some("b"));
    assert_eq!(ctl.transport(), TransportState::Paused);
    assert!(!ctl.is_playing());
    let events = drain(&rx);
    assert!(matches!(events.last(), Some(PlaybackEvent::StartFailed(s)) if !s.is_playing()));

    // Resuming a source that never loaded keeps the session paused.
    ctl.toggle_play();
    assert_eq!(ctl.transport(), TransportState::Paused);

    // Navigation still works from the failed track.
    ctl.advance();
    assert_eq!(current_id(&ctl), Some("c"));
    assert!(ctl.is_playing());
}

fn loads_of(ctl: &PlaybackController<FakeEngine>, locator: &str) -> usize {
    ctl.engine()
        .calls
        .iter()
        .filter(|c| **c == Call::Load(locator.to_string()))
        .count()
}

#[test]
fn reselecting_a_track_that_failed_to_load_retries_it() {
    let mut engine = FakeEngine::default();
    engine.broken_sources.push("/music/b.mp3".into());
    let mut ctl = PlaybackController::new(engine, 1.0);

    ctl.play(t("b"), abc());
    assert_eq!(ctl.transport(), TransportState::Paused);
    assert_eq!(loads_of(&ctl, "/music/b.mp3"), 1);

    ctl.engine_mut().broken_sources.clear();
    ctl.play(t("b"), abc());

    assert_eq!(loads_of(&ctl, "/music/b.mp3"), 2);
    assert_eq!(current_id(&ctl), Some("b"));
    assert!(ctl.is_playing());
}

#[test]
fn toggle_after_failed_load_retries_the_source() {
    let mut engine = FakeEngine::default();
    engine.broken_sources.push("/music/a.mp3".into());
    let mut ctl = PlaybackController::new(engine, 1.0);
    let rx = ctl.subscribe();

    ctl.play(t("a"), Vec::new());
    ctl.engine_mut().broken_sources.clear();
    drain(&rx);

    ctl.toggle_play();
    assert!(ctl.is_playing());
    assert_eq!(ctl.current_time(), Duration::ZERO);
    assert!(matches!(drain(&rx).last(), Some(PlaybackEvent::TrackStarted(_))));
}

#[test]
fn failed_resume_stays_paused() {
    let mut ctl = controller();
    ctl.play(t("a"), Vec::new());
    ctl.pause();
    ctl.engine_mut().refuse_play = true;

    ctl.toggle_play();
    assert_eq!(ctl.transport(), TransportState::Paused);
}

#[test]
fn observers_see_every_transition() {
    let mut ctl = controller();
    let rx = ctl.subscribe();

    ctl.play(t("a"), abc());
    metadata(&mut ctl, 100);
    tick(&mut ctl, 1);
    ctl.toggle_play();
    ctl.toggle_play();
    ctl.seek(10.0);
    ctl.set_volume(0.5);
    ctl.retreat();
    ctl.stop();

    let kinds: Vec<&'static str> = drain(&rx)
        .iter()
        .map(|e| match e {
            PlaybackEvent::QueueReplaced(_) => "queue",
            PlaybackEvent::TrackStarted(_) => "started",
            PlaybackEvent::StartFailed(_) => "failed",
            PlaybackEvent::Paused(_) => "paused",
            PlaybackEvent::Resumed(_) => "resumed",
            PlaybackEvent::Restarted(_) => "restarted",
            PlaybackEvent::Stopped(_) => "stopped",
            PlaybackEvent::Seeked(_) => "seeked",
            PlaybackEvent::VolumeChanged(_) => "volume",
            PlaybackEvent::PositionChanged(_) => "position",
            PlaybackEvent::DurationKnown(_) => "duration",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "queue", "started", "duration", "position", "paused", "resumed", "seeked", "volume",
            "restarted", "stopped"
        ]
    );
}

#[test]
fn snapshots_reflect_state_at_publish_time() {
    let mut ctl = controller();
    let rx = ctl.subscribe();

    ctl.play(t("a"), abc());
    ctl.set_volume(0.3);

    let events = drain(&rx);
    let started = events
        .iter()
        .find(|e| matches!(e, PlaybackEvent::TrackStarted(_)))
        .unwrap()
        .snapshot();
    assert_eq!(started.track.as_ref().map(|t| t.id.as_str()), Some("a"));
    assert_eq!(started.queue.len(), 3);
    assert!(started.is_playing());
    assert_eq!(started.volume, 1.0);

    assert_eq!(events.last().unwrap().snapshot().volume, 0.3);
}

#[test]
fn dropped_subscribers_are_pruned() {
    let mut observers = super::observers::Observers::default();
    let kept = observers.subscribe();
    drop(observers.subscribe());
    assert_eq!(observers.subscriber_count(), 2);

    let mut ctl = controller();
    observers.publish(PlaybackEvent::Stopped(ctl.snapshot()));
    assert_eq!(observers.subscriber_count(), 1);
    assert_eq!(kept.try_iter().count(), 1);

    // Controllers keep working with no listeners at all.
    drop(ctl.subscribe());
    ctl.play(t("a"), Vec::new());
    assert!(ctl.is_playing());
}

#[test]
fn queue_neighbours() {
    let q = abc();
    assert_eq!(next_after(&q, &t("a")), Some(&t("b")));
    assert_eq!(next_after(&q, &t("c")), None);
    assert_eq!(next_after(&q, &t("z")), None);
    assert_eq!(previous_before(&q, &t("b")), Some(&t("a")));
    assert_eq!(previous_before(&q, &t("a")), None);
    assert_eq!(previous_before(&[], &t("a")), None);
}

#[test]
fn same_order_compares_ids_in_order() {
    assert!(same_order(&abc(), &abc()));
    assert!(!same_order(&abc(), &[t("a"), t("c"), t("b")]));
    assert!(!same_order(&abc(), &[t("a"), t("b")]));
}
