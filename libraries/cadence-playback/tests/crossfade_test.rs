//! Crossfade scheduling tests
//!
//! Driven through `tick_at` with explicit instants, so ramp progress is
//! deterministic and no test sleeps.

use cadence_playback::{
    CrossfadeSettings, EngineConfig, FadeCurve, OutputPlayer, PlaybackEngine, PlaybackError,
    PlaybackEvent, PlaybackState, PlayerFactory, Result, Track, TrackSource,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ===== Test Helpers =====

#[derive(Debug)]
struct PlayerState {
    duration: Duration,
    position: Duration,
    playing: bool,
    gain: f32,
    stopped: bool,
}

#[derive(Clone)]
struct PlayerHandle(Arc<Mutex<PlayerState>>);

impl PlayerHandle {
    fn new(duration: Duration) -> Self {
        Self(Arc::new(Mutex::new(PlayerState {
            duration,
            position: Duration::ZERO,
            playing: false,
            gain: 1.0,
            stopped: false,
        })))
    }

    fn set_position(&self, position: Duration) {
        self.0.lock().unwrap().position = position;
    }

    fn gain(&self) -> f32 {
        self.0.lock().unwrap().gain
    }

    fn is_playing(&self) -> bool {
        self.0.lock().unwrap().playing
    }

    fn is_stopped(&self) -> bool {
        self.0.lock().unwrap().stopped
    }
}

struct ScriptedPlayer(PlayerHandle);

impl OutputPlayer for ScriptedPlayer {
    fn play(&mut self) -> Result<()> {
        self.0 .0.lock().unwrap().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.0 .0.lock().unwrap().playing = false;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.0 .0.lock().unwrap();
        state.playing = false;
        state.stopped = true;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let mut state = self.0 .0.lock().unwrap();
        state.position = position.min(state.duration);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.0 .0.lock().unwrap().gain = gain;
    }

    fn position(&self) -> Duration {
        self.0 .0.lock().unwrap().position
    }

    fn duration(&self) -> Duration {
        self.0 .0.lock().unwrap().duration
    }

    fn is_finished(&self) -> bool {
        let state = self.0 .0.lock().unwrap();
        state.position >= state.duration
    }
}

#[derive(Default)]
struct PlatformState {
    created: Vec<(PathBuf, PlayerHandle)>,
    durations: HashMap<PathBuf, Duration>,
    failing: Vec<PathBuf>,
}

#[derive(Clone, Default)]
struct TestPlatform(Arc<Mutex<PlatformState>>);

impl TestPlatform {
    fn new() -> Self {
        Self::default()
    }

    fn set_duration(&self, path: &str, duration: Duration) {
        self.0
            .lock()
            .unwrap()
            .durations
            .insert(PathBuf::from(path), duration);
    }

    fn fail_path(&self, path: &str) {
        self.0.lock().unwrap().failing.push(PathBuf::from(path));
    }

    fn created_count(&self) -> usize {
        self.0.lock().unwrap().created.len()
    }

    fn handle(&self, index: usize) -> PlayerHandle {
        self.0.lock().unwrap().created[index].1.clone()
    }
}

impl PlayerFactory for TestPlatform {
    fn local(&self, path: &Path) -> Result<Box<dyn OutputPlayer>> {
        let mut state = self.0.lock().unwrap();
        if state.failing.iter().any(|p| p == path) {
            return Err(PlaybackError::SourceUnavailable(path.display().to_string()));
        }
        let duration = state
            .durations
            .get(path)
            .copied()
            .unwrap_or(Duration::from_secs(180));
        let handle = PlayerHandle::new(duration);
        state.created.push((path.to_path_buf(), handle.clone()));
        Ok(Box::new(ScriptedPlayer(handle)))
    }
}

fn local_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        duration: Duration::from_secs(10),
        source: TrackSource::Local(PathBuf::from(format!("/music/{}.mp3", id))),
    }
}

fn remote_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Test Artist".to_string(),
        duration: Duration::from_secs(10),
        source: TrackSource::Remote(format!("yt:{}", id)),
    }
}

/// Engine playing `tracks[0]` with a 3s linear crossfade and master gain 1.0,
/// plus the handle of the outgoing player
fn crossfading_engine(
    platform: &TestPlatform,
    tracks: Vec<Track>,
) -> (PlaybackEngine, PlayerHandle) {
    for track in &tracks {
        if let TrackSource::Local(ref path) = track.source {
            platform.set_duration(&path.display().to_string(), Duration::from_secs(10));
        }
    }

    let config = EngineConfig {
        crossfade: CrossfadeSettings::with_duration(Duration::from_secs(3)),
        ..EngineConfig::default()
    };
    let mut engine = PlaybackEngine::new(Box::new(platform.clone()), config);
    engine.set_crossfade_curve(FadeCurve::Linear);
    engine.set_volume(1.0);

    engine.play_now(tracks[0].clone(), Some(tracks));
    engine.drain_events();
    let outgoing = platform.handle(platform.created_count() - 1);
    (engine, outgoing)
}

// ===== Scheduling =====

#[test]
fn crossfade_starts_inside_the_window() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8)); // 2s remaining < 3s fade
    let t0 = Instant::now();
    engine.tick_at(t0);

    assert!(engine.is_crossfading());
    assert_eq!(platform.created_count(), 2);

    let incoming = platform.handle(1);
    assert!(incoming.is_playing());
    assert_eq!(incoming.gain(), 0.0);
    assert!((outgoing.gain() - 1.0).abs() < 0.001);

    let events = engine.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::CrossfadeStarted { from_track_id, to_track_id, .. }
            if from_track_id == "a" && to_track_id == "b"
    )));
}

#[test]
fn no_crossfade_outside_the_window() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(5)); // 5s remaining > 3s fade
    engine.tick_at(Instant::now());

    assert!(!engine.is_crossfading());
    assert_eq!(platform.created_count(), 1);
}

#[test]
fn ramp_splits_gain_between_both_players() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0);
    engine.tick_at(t0 + Duration::from_millis(1500)); // halfway through 3s

    let incoming = platform.handle(1);
    assert!((outgoing.gain() - 0.5).abs() < 0.01);
    assert!((incoming.gain() - 0.5).abs() < 0.01);
}

#[test]
fn completion_promotes_the_incoming_player() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0);
    engine.drain_events();
    engine.tick_at(t0 + Duration::from_millis(3100));

    assert!(!engine.is_crossfading());
    assert!(outgoing.is_stopped());

    let incoming = platform.handle(1);
    assert!(incoming.is_playing());
    assert!((incoming.gain() - 1.0).abs() < 0.001);

    assert_eq!(engine.current_track().unwrap().id, "b");
    assert_eq!(engine.queue_cursor(), Some(1));
    assert_eq!(engine.state(), PlaybackState::Playing);

    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::CrossfadeCompleted)));
    assert!(events.iter().any(
        |e| matches!(e, PlaybackEvent::TrackChanged { track_id: Some(id) } if id == "b")
    ));
}

// ===== Cancellation =====

#[test]
fn pause_cancels_the_overlap() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0);
    engine.tick_at(t0 + Duration::from_millis(1500));
    engine.drain_events();

    engine.pause();

    assert!(!engine.is_crossfading());
    assert_eq!(engine.state(), PlaybackState::Paused);
    assert_eq!(engine.current_track().unwrap().id, "a");

    // Incoming discarded, outgoing restored to full master volume
    let incoming = platform.handle(1);
    assert!(incoming.is_stopped());
    assert!((outgoing.gain() - 1.0).abs() < 0.001);

    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, PlaybackEvent::CrossfadeCancelled)));
}

#[test]
fn seek_cancels_the_overlap() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());

    engine.seek(Duration::from_secs(2)).unwrap();

    assert!(!engine.is_crossfading());
    assert_eq!(engine.current_track().unwrap().id, "a");
    assert!(platform.handle(1).is_stopped());
    assert_eq!(engine.position(), Duration::from_secs(2));
}

#[test]
fn removing_the_incoming_track_cancels_the_overlap() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());
    assert!(engine.is_crossfading());

    engine.remove_at(1); // b, the incoming side

    assert!(!engine.is_crossfading());
    assert_eq!(engine.current_track().unwrap().id, "a");
    assert_eq!(engine.queue_len(), 1);
    assert!(platform.handle(1).is_stopped());
}

#[test]
fn reorder_mid_fade_keeps_cursor_on_the_promoted_track() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) = crossfading_engine(
        &platform,
        vec![local_track("a"), local_track("b"), local_track("c")],
    );

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0); // overlap a -> b begins

    engine.move_track(2, 1); // active ordering becomes [a, c, b]
    engine.tick_at(t0 + Duration::from_millis(3100));

    assert_eq!(engine.current_track().unwrap().id, "b");
    let cursor = engine.queue_cursor().unwrap();
    assert_eq!(engine.queue_tracks()[cursor].id, "b");

    // Advancing from here must not replay c
    engine.advance();
    assert_eq!(engine.state(), PlaybackState::Stopped);
}

#[test]
fn shuffle_toggle_mid_fade_keeps_cursor_on_the_promoted_track() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) = crossfading_engine(
        &platform,
        vec![local_track("a"), local_track("b"), local_track("c")],
    );

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0); // overlap a -> b begins

    engine.toggle_shuffle();
    engine.tick_at(t0 + Duration::from_millis(3100));

    assert_eq!(engine.current_track().unwrap().id, "b");
    let cursor = engine.queue_cursor().unwrap();
    assert_eq!(engine.queue_tracks()[cursor].id, "b");
}

#[test]
fn volume_change_mid_fade_scales_both_sides() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    outgoing.set_position(Duration::from_secs(8));
    let t0 = Instant::now();
    engine.tick_at(t0);
    engine.tick_at(t0 + Duration::from_millis(1500));

    engine.mute();

    let incoming = platform.handle(1);
    assert_eq!(outgoing.gain(), 0.0);
    assert_eq!(incoming.gain(), 0.0);
    assert!(engine.is_crossfading());

    engine.unmute();
    assert!((outgoing.gain() - 0.5).abs() < 0.01);
    assert!((incoming.gain() - 0.5).abs() < 0.01);
}

// ===== Eligibility =====

#[test]
fn remote_neighbor_disables_the_crossfade() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), remote_track("r")]);

    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());

    assert!(!engine.is_crossfading());
    assert_eq!(platform.created_count(), 1);
}

#[test]
fn disabled_crossfade_never_starts() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);
    engine.set_crossfade_enabled(false);

    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());

    assert!(!engine.is_crossfading());
}

#[test]
fn unplayable_incoming_falls_back_to_hard_advance() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);
    platform.fail_path("/music/b.mp3");

    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());
    assert!(!engine.is_crossfading());

    // Track a ends normally; the hard advance surfaces the failure
    outgoing.set_position(Duration::from_secs(10));
    engine.tick_at(Instant::now());

    assert_eq!(engine.state(), PlaybackState::Idle);
    assert!(engine.last_error().is_some());
}

#[test]
fn no_crossfade_while_paused() {
    let platform = TestPlatform::new();
    let (mut engine, outgoing) =
        crossfading_engine(&platform, vec![local_track("a"), local_track("b")]);

    engine.pause();
    outgoing.set_position(Duration::from_secs(8));
    engine.tick_at(Instant::now());

    assert!(!engine.is_crossfading());
    assert_eq!(platform.created_count(), 1);
}
