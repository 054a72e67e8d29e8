//! Playback engine - core orchestration
//!
//! Owns the transport state machine, the play queue, the crossfade scheduler
//! and the pending event buffer. The engine is single-writer: every mutation
//! goes through `&mut self` on one logical owner (the application's command
//! context). Long-running work never happens here; remote source resolution
//! is requested through a `LoadRequested` event and completed through
//! `complete_load` with a generation token, so a stale resolution arriving
//! after a newer command is discarded rather than applied.

use crate::{
    crossfade::{ActiveCrossfade, CrossfadeSettings, FadeCurve},
    error::{PlaybackError, Result},
    events::{LoadGeneration, PlaybackEvent},
    now_playing::NowPlaying,
    player::{OutputPlayer, PlayerFactory},
    queue::{AdvanceOutcome, Queue, RemoveOutcome},
    types::{EngineConfig, PlaybackState, Track, TrackSource},
    volume::Volume,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The playback transport and queue engine
///
/// Constructed once by the application's composition root and passed by
/// reference to callers; there is no hidden global instance.
pub struct PlaybackEngine {
    // Transport record
    state: PlaybackState,
    current: Option<Track>,
    player: Option<Box<dyn OutputPlayer>>,

    // Queue
    queue: Queue,

    // Settings
    volume: Volume,
    crossfade: CrossfadeSettings,
    restart_threshold: Duration,
    position_epsilon: Duration,

    // Crossfade overlap (both players live only while this is Some)
    session: Option<ActiveCrossfade>,

    // Platform integration
    factory: Box<dyn PlayerFactory>,

    // Load cancellation
    next_generation: u64,
    pending_load: Option<u64>,

    // Failure recovery: bounded so a queue of all-broken tracks cannot
    // advance forever under repeat-all
    consecutive_failures: usize,

    // Progress publishing
    last_published: Option<Duration>,

    // Last surfaced error, kept for display
    last_error: Option<PlaybackError>,

    // Event buffer drained by the owner
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create a new engine
    pub fn new(factory: Box<dyn PlayerFactory>, config: EngineConfig) -> Self {
        let mut queue = Queue::new();
        queue.set_repeat(config.repeat);

        Self {
            state: PlaybackState::Idle,
            current: None,
            player: None,
            queue,
            volume: Volume::new(config.volume),
            crossfade: config.crossfade,
            restart_threshold: config.restart_threshold,
            position_epsilon: config.position_epsilon,
            session: None,
            factory,
            next_generation: 0,
            pending_load: None,
            consecutive_failures: 0,
            last_published: None,
            last_error: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Loading =====

    /// Load a track, replacing whatever is current
    ///
    /// The requested track becomes "current" immediately so the UI reflects
    /// intent before audio is ready. Local sources complete synchronously;
    /// remote sources emit `LoadRequested` and complete later through
    /// `complete_load` with the returned generation.
    pub fn load_track(&mut self, track: Track) -> LoadGeneration {
        self.cancel_session();
        self.teardown_player();

        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending_load = Some(generation);

        debug!(track_id = %track.id, generation, "Loading track");

        self.current = Some(track.clone());
        self.last_published = None;
        self.set_state(PlaybackState::Loading);
        self.emit(PlaybackEvent::TrackChanged {
            track_id: Some(track.id.clone()),
        });

        match &track.source {
            TrackSource::Local(path) => {
                // Local sources are always synchronously available
                match self.factory.local(path) {
                    Ok(player) => self.finish_load(player),
                    Err(e) => self.fail_current(e),
                }
            }
            TrackSource::Remote(_) => {
                self.emit(PlaybackEvent::LoadRequested {
                    track,
                    generation: LoadGeneration(generation),
                });
            }
        }

        LoadGeneration(generation)
    }

    /// Complete an asynchronous load
    ///
    /// Called by the composition root on the command context once resolution
    /// finished (successfully or not). A completion whose generation no
    /// longer matches the outstanding load is discarded.
    pub fn complete_load(
        &mut self,
        generation: LoadGeneration,
        result: std::result::Result<Box<dyn OutputPlayer>, PlaybackError>,
    ) {
        if self.pending_load != Some(generation.0) {
            debug!(generation = generation.0, "Discarding stale load completion");
            return;
        }
        self.pending_load = None;

        match result {
            Ok(player) => self.finish_load(player),
            Err(e) => self.fail_current(e),
        }
    }

    fn finish_load(&mut self, mut player: Box<dyn OutputPlayer>) {
        self.pending_load = None;
        player.set_gain(self.volume.gain());

        if let Err(e) = player.play() {
            self.fail_current(PlaybackError::DecodeFailure(e.to_string()));
            return;
        }

        // A provisional remote duration is confirmed by the primitive
        if let Some(ref mut current) = self.current {
            let reported = player.duration();
            if !reported.is_zero() {
                current.duration = reported;
            }
        }

        self.consecutive_failures = 0;
        self.last_error = None;
        self.player = Some(player);
        self.set_state(PlaybackState::Playing);
        info!(
            track_id = self.current.as_deref_id(),
            "Playback started"
        );
    }

    /// Recover from a resolution or decode failure
    ///
    /// Treated like "track ended": advance to the next entry when one exists,
    /// otherwise halt with the error available for display.
    fn fail_current(&mut self, error: PlaybackError) {
        self.pending_load = None;
        self.teardown_player();
        warn!(error = %error, "Playback failure");
        self.emit(PlaybackEvent::Error {
            message: error.to_string(),
        });

        self.consecutive_failures += 1;
        let give_up =
            self.queue.len() <= 1 || self.consecutive_failures >= self.queue.len();

        if !give_up {
            if let AdvanceOutcome::Moved(next) = self.queue.advance_forward() {
                self.load_track(next);
                return;
            }
        }

        self.last_error = Some(error);
        self.set_state(PlaybackState::Idle);
    }

    // ===== Playback control =====

    /// Start or resume playback (idempotent while playing)
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => Ok(()),
            PlaybackState::Paused => {
                if let Some(ref mut player) = self.player {
                    player.play()?;
                }
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Idle | PlaybackState::Stopped => {
                self.consecutive_failures = 0;
                let track = self
                    .queue
                    .current()
                    .cloned()
                    .or_else(|| self.queue.start())
                    .ok_or(PlaybackError::QueueEmpty)?;
                self.load_track(track);
                Ok(())
            }
        }
    }

    /// Pause playback (idempotent while paused)
    ///
    /// Cancels an in-progress crossfade first so exactly one primitive is
    /// left holding position.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.cancel_session();
            if let Some(ref mut player) = self.player {
                let _ = player.pause();
            }
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Toggle between playing and paused
    pub fn toggle(&mut self) -> Result<()> {
        if self.state == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Stop playback, releasing the output primitive
    ///
    /// Clears the current track; the queue and cursor are kept so `play`
    /// resumes from the same entry.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.outgoing.stop();
            session.incoming.stop();
            self.emit(PlaybackEvent::CrossfadeCancelled);
        }
        self.teardown_player();
        self.pending_load = None;
        self.current = None;
        self.last_published = None;
        self.set_state(PlaybackState::Stopped);
        self.emit(PlaybackEvent::TrackChanged { track_id: None });
    }

    /// Seek within the current track
    ///
    /// The target is clamped to `[0, duration]`. Exact for local sources;
    /// best-effort for remote streams, where the position reported afterwards
    /// may differ from the request.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        self.cancel_session();

        let player = self.player.as_mut().ok_or(PlaybackError::NoTrackLoaded)?;
        let clamped = position.min(player.duration());
        player.seek(clamped)?;
        self.last_published = None;
        Ok(())
    }

    // ===== Volume =====

    /// Set master volume, clamped to `[0, 1]`
    ///
    /// Applies to whichever primitives are live, including both sides of an
    /// in-progress crossfade scaled by the ramp.
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_master_gain();
        self.emit_volume_changed();
    }

    /// Current master volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Mute, preserving the volume level
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_master_gain();
        self.emit_volume_changed();
    }

    /// Unmute
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_master_gain();
        self.emit_volume_changed();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_master_gain();
        self.emit_volume_changed();
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    fn apply_master_gain(&mut self) {
        let gain = self.volume.gain();
        let curve = self.crossfade.curve;
        if let Some(ref mut session) = self.session {
            let progress = session.progress;
            session.apply_gains(progress, gain, curve);
        } else if let Some(ref mut player) = self.player {
            player.set_gain(gain);
        }
    }

    // ===== Queue commands =====

    /// Replace the queue and play `track` immediately
    ///
    /// `context` becomes the new queue (or the singleton `[track]`); shuffle,
    /// if active, keeps the requested track first in the new permutation.
    pub fn play_now(&mut self, track: Track, context: Option<Vec<Track>>) {
        self.consecutive_failures = 0;
        self.queue.play_now(track.clone(), context);
        self.emit_queue_changed();
        self.load_track(track);
    }

    /// Append a track to the end of the queue
    pub fn enqueue(&mut self, track: Track) {
        self.queue.enqueue(track);
        self.emit_queue_changed();
    }

    /// Remove the entry at `index`; out-of-range is a no-op
    ///
    /// Removing the currently playing entry continues on the entry that
    /// followed it (wrapping per repeat policy), or halts when none remains.
    pub fn remove_at(&mut self, index: usize) {
        // An overlap whose incoming track is being removed cannot complete
        let removes_incoming = self.session.as_ref().is_some_and(|session| {
            self.queue
                .tracks()
                .get(index)
                .is_some_and(|t| t.id == session.incoming_track.id)
        });
        if removes_incoming {
            self.cancel_session();
        }

        match self.queue.remove_at(index) {
            RemoveOutcome::OutOfRange => {}
            RemoveOutcome::Removed => self.emit_queue_changed(),
            RemoveOutcome::RemovedCurrent { next } => {
                self.emit_queue_changed();

                if !matches!(
                    self.state,
                    PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Loading
                ) {
                    return;
                }

                self.cancel_session();
                match next {
                    Some(track) => {
                        let was_paused = self.state == PlaybackState::Paused;
                        self.load_track(track);
                        if was_paused {
                            self.pause();
                        }
                    }
                    None => self.halt_exhausted(),
                }
            }
        }
    }

    /// Move an entry from `from` to `to`; out-of-range is a no-op
    pub fn move_track(&mut self, from: usize, to: usize) {
        self.queue.move_track(from, to);
        self.emit_queue_changed();
    }

    /// Move the entry at `index` to play directly after the current one
    pub fn move_to_play_next(&mut self, index: usize) {
        self.queue.move_to_play_next(index);
        self.emit_queue_changed();
    }

    /// Toggle shuffle; never interrupts the audible track
    pub fn toggle_shuffle(&mut self) {
        self.queue.toggle_shuffle();
        self.emit_queue_changed();
    }

    /// Whether the shuffled ordering is active
    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled()
    }

    /// Set the repeat mode
    pub fn set_repeat(&mut self, mode: crate::types::RepeatMode) {
        self.queue.set_repeat(mode);
    }

    /// Current repeat mode
    pub fn repeat(&self) -> crate::types::RepeatMode {
        self.queue.repeat()
    }

    // ===== Navigation =====

    /// Skip to the next entry per the repeat policy
    ///
    /// At the end of the queue without repeat-all, playback stops and the
    /// current track is cleared.
    pub fn advance(&mut self) {
        self.cancel_session();
        self.consecutive_failures = 0;
        self.advance_cursor();
    }

    fn advance_cursor(&mut self) {
        match self.queue.advance() {
            AdvanceOutcome::Restarted => self.restart_current(),
            AdvanceOutcome::Moved(track) => {
                self.load_track(track);
            }
            AdvanceOutcome::Exhausted => self.halt_exhausted(),
        }
    }

    /// Go back: restart when well into the track, otherwise step to the
    /// previous entry (wrapping only under repeat-all)
    pub fn retreat(&mut self) {
        self.cancel_session();
        self.consecutive_failures = 0;

        let position = self
            .player
            .as_ref()
            .map(|p| p.position())
            .unwrap_or_default();

        if self.player.is_some() && position > self.restart_threshold {
            self.restart_current();
        } else if let Some(previous) = self.queue.step_back() {
            self.load_track(previous);
        } else {
            self.restart_current();
        }
    }

    /// Restart the current track from zero
    ///
    /// Remote tracks re-seek rather than re-resolve; a cached stream link
    /// that expired mid-track surfaces on the next real load instead.
    fn restart_current(&mut self) {
        if let Some(ref mut player) = self.player {
            let _ = player.seek(Duration::ZERO);
            self.last_published = None;
        } else if let Some(track) = self.current.clone() {
            self.load_track(track);
        }
    }

    fn halt_exhausted(&mut self) {
        self.teardown_player();
        self.pending_load = None;
        self.current = None;
        self.last_published = None;
        self.queue.clear_cursor();
        self.set_state(PlaybackState::Stopped);
        self.emit(PlaybackEvent::TrackChanged { track_id: None });
    }

    // ===== Progress tick =====

    /// Periodic progress tick at the current wall-clock instant
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Periodic progress tick
    ///
    /// Drives the crossfade ramp, detects natural track end and playback
    /// failures, and republishes position when it moved past the epsilon.
    /// Runs on the same single command context as every other mutation.
    pub fn tick_at(&mut self, now: Instant) {
        if self.session.is_some() {
            self.tick_session(now);
        }

        if self.state != PlaybackState::Playing {
            return;
        }

        if self.session.is_none() {
            if let Some(message) = self.player.as_ref().and_then(|p| p.failure()) {
                self.fail_current(PlaybackError::DecodeFailure(message));
                return;
            }
            if self.player.as_ref().is_some_and(|p| p.is_finished()) {
                self.handle_track_finished();
                return;
            }

            self.maybe_start_crossfade(now);
        }

        self.publish_position();
    }

    fn handle_track_finished(&mut self) {
        if let Some(ref track) = self.current {
            self.pending_events.push(PlaybackEvent::TrackFinished {
                track_id: track.id.clone(),
            });
        }
        self.advance_cursor();
    }

    fn publish_position(&mut self) {
        let (position, duration) = match self.session {
            Some(ref session) => (
                session.outgoing.position(),
                session.outgoing.duration(),
            ),
            None => match self.player {
                Some(ref player) => (player.position(), player.duration()),
                None => return,
            },
        };

        let moved_enough = match self.last_published {
            None => true,
            Some(last) => {
                let delta = if position > last {
                    position - last
                } else {
                    last - position
                };
                delta > self.position_epsilon
            }
        };

        if moved_enough {
            self.last_published = Some(position);
            self.emit(PlaybackEvent::PositionChanged {
                position_ms: position.as_millis() as u64,
                duration_ms: duration.as_millis() as u64,
            });
        }
    }

    // ===== Crossfade =====

    fn maybe_start_crossfade(&mut self, now: Instant) {
        if !self.crossfade.enabled {
            return;
        }

        // Local-to-local adjacency only: overlapping two network streams
        // doubles resolution cost and buffering makes the timing unreliable
        let current_is_local = self
            .current
            .as_ref()
            .is_some_and(|t| t.source.is_local());
        if !current_is_local {
            return;
        }

        let next = match self.queue.peek_next() {
            Some(t) if t.source.is_local() => t.clone(),
            _ => return,
        };

        let Some(ref player) = self.player else { return };
        let duration = player.duration();
        if duration.is_zero() {
            return;
        }
        let remaining = duration.saturating_sub(player.position());
        if remaining > self.crossfade.duration {
            return;
        }

        let TrackSource::Local(ref path) = next.source else {
            return;
        };

        match self.factory.local(path) {
            Ok(mut incoming) => {
                incoming.set_gain(0.0);
                if incoming.play().is_err() {
                    // Normal end-of-track advance will deal with it
                    return;
                }

                let Some(outgoing) = self.player.take() else { return };
                let mut session = ActiveCrossfade {
                    outgoing,
                    incoming,
                    incoming_track: next.clone(),
                    started_at: now,
                    fade_duration: self.crossfade.duration,
                    progress: 0.0,
                };
                session.apply_gains(0.0, self.volume.gain(), self.crossfade.curve);

                let from_id = self.current.as_deref_id().unwrap_or_default().to_string();
                debug!(from = %from_id, to = %next.id, "Crossfade started");
                self.session = Some(session);
                self.emit(PlaybackEvent::CrossfadeStarted {
                    from_track_id: from_id,
                    to_track_id: next.id,
                    duration_ms: self.crossfade.duration.as_millis() as u64,
                });
            }
            Err(e) => {
                debug!(error = %e, "Next track not playable, skipping crossfade");
            }
        }
    }

    fn tick_session(&mut self, now: Instant) {
        let gain = self.volume.gain();
        let curve = self.crossfade.curve;

        let Some(ref mut session) = self.session else { return };
        let progress = session.progress_at(now);

        if progress >= 1.0 {
            self.complete_session();
        } else {
            session.apply_gains(progress, gain, curve);
        }
    }

    /// Atomic handoff: the incoming player becomes the sole active primitive
    /// and the cursor moves to the incoming track
    fn complete_session(&mut self) {
        let Some(mut session) = self.session.take() else { return };

        session.outgoing.stop();
        let mut incoming = session.incoming;
        incoming.set_gain(self.volume.gain());

        // The queue may have been reordered while the overlap ran; follow
        // the promoted track by identity, not by stepping the cursor
        self.queue.relocate_cursor(&session.incoming_track.id);

        self.player = Some(incoming);
        self.current = Some(session.incoming_track);
        self.last_published = None;

        self.emit(PlaybackEvent::TrackChanged {
            track_id: self.current.as_ref().map(|t| t.id.clone()),
        });
        self.emit(PlaybackEvent::CrossfadeCompleted);
    }

    /// Cancel an active overlap: discard the incoming player and restore the
    /// outgoing one to full master volume
    fn cancel_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.incoming.stop();
            let mut outgoing = session.outgoing;
            outgoing.set_gain(self.volume.gain());
            self.player = Some(outgoing);
            self.emit(PlaybackEvent::CrossfadeCancelled);
        }
    }

    /// Whether a crossfade overlap is in progress
    pub fn is_crossfading(&self) -> bool {
        self.session.is_some()
    }

    /// Update crossfade settings; disabling cancels any active overlap
    pub fn set_crossfade_settings(&mut self, settings: CrossfadeSettings) {
        if !settings.enabled {
            self.cancel_session();
        }
        self.crossfade = settings;
    }

    /// Enable or disable crossfade
    pub fn set_crossfade_enabled(&mut self, enabled: bool) {
        let mut settings = self.crossfade.clone();
        settings.enabled = enabled;
        self.set_crossfade_settings(settings);
    }

    /// Set the overlap duration (capped at 10s)
    pub fn set_crossfade_duration(&mut self, duration: Duration) {
        self.crossfade.duration = duration.min(Duration::from_secs(10));
    }

    /// Set the fade curve
    pub fn set_crossfade_curve(&mut self, curve: FadeCurve) {
        self.crossfade.curve = curve;
    }

    /// Current crossfade settings
    pub fn crossfade_settings(&self) -> &CrossfadeSettings {
        &self.crossfade
    }

    // ===== State queries =====

    /// Current transport state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The current track, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Current playback position
    ///
    /// During a crossfade this reports the outgoing track, which is still
    /// "current" until the handoff completes.
    pub fn position(&self) -> Duration {
        match self.session {
            Some(ref session) => session.outgoing.position(),
            None => self
                .player
                .as_ref()
                .map(|p| p.position())
                .unwrap_or_default(),
        }
    }

    /// Current track duration
    pub fn duration(&self) -> Duration {
        match self.session {
            Some(ref session) => session.outgoing.duration(),
            None => self
                .player
                .as_ref()
                .map(|p| p.duration())
                .or_else(|| self.current.as_ref().map(|t| t.duration))
                .unwrap_or_default(),
        }
    }

    /// Tracks in the active queue ordering
    pub fn queue_tracks(&self) -> &[Track] {
        self.queue.tracks()
    }

    /// Queue length
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Cursor position in the active ordering
    pub fn queue_cursor(&self) -> Option<usize> {
        self.queue.cursor()
    }

    /// Last surfaced error, kept for display
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Project the external-facing now-playing snapshot
    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.current.as_ref().map(|track| NowPlaying {
            title: track.title.clone(),
            artist: track.artist.clone(),
            is_playing: self.state == PlaybackState::Playing,
            position: self.position(),
            duration: self.duration(),
            artwork: None,
        })
    }

    // ===== Events =====

    /// Drain all pending events, in emission order
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_volume_changed(&mut self) {
        let volume = self.volume.level();
        let muted = self.volume.is_muted();
        self.emit(PlaybackEvent::VolumeChanged { volume, muted });
    }

    fn emit_queue_changed(&mut self) {
        let length = self.queue.len();
        self.emit(PlaybackEvent::QueueChanged { length });
    }

    fn teardown_player(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.stop();
        }
    }
}

/// Small helper so logging sites can borrow the current track id
trait AsDerefId {
    fn as_deref_id(&self) -> Option<&str>;
}

impl AsDerefId for Option<Track> {
    fn as_deref_id(&self) -> Option<&str> {
        self.as_ref().map(|t| t.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::FakePlayer;
    use std::path::{Path, PathBuf};

    struct FakeFactory;

    impl PlayerFactory for FakeFactory {
        fn local(&self, _path: &Path) -> Result<Box<dyn OutputPlayer>> {
            Ok(Box::new(FakePlayer::new(Duration::from_secs(180))))
        }
    }

    fn local(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Artist".to_string(),
            duration: Duration::from_secs(180),
            source: TrackSource::Local(PathBuf::from(format!("/music/{}.mp3", id))),
        }
    }

    fn engine() -> PlaybackEngine {
        PlaybackEngine::new(Box::new(FakeFactory), EngineConfig::default())
    }

    #[test]
    fn starts_idle_with_nothing_loaded() {
        let engine = engine();
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_track().is_none());
        assert_eq!(engine.queue_len(), 0);
    }

    #[test]
    fn local_load_completes_synchronously() {
        let mut engine = engine();
        engine.load_track(local("a"));

        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.current_track().unwrap().id, "a");
    }

    #[test]
    fn load_generations_are_monotonic() {
        let mut engine = engine();
        let g1 = engine.load_track(local("a"));
        let g2 = engine.load_track(local("b"));
        assert!(g2.0 > g1.0);
    }

    #[test]
    fn events_come_out_in_mutation_order() {
        let mut engine = engine();
        engine.play_now(local("a"), None);

        let events = engine.drain_events();
        let queue_pos = events
            .iter()
            .position(|e| matches!(e, PlaybackEvent::QueueChanged { .. }))
            .unwrap();
        let track_pos = events
            .iter()
            .position(|e| matches!(e, PlaybackEvent::TrackChanged { .. }))
            .unwrap();
        assert!(queue_pos < track_pos);
        assert!(!engine.has_pending_events());
    }

    #[test]
    fn drain_empties_the_buffer() {
        let mut engine = engine();
        engine.set_volume(0.5);

        assert!(engine.has_pending_events());
        assert!(!engine.drain_events().is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn state_change_events_are_deduplicated() {
        let mut engine = engine();
        engine.play_now(local("a"), None);
        engine.drain_events();

        engine.play().unwrap(); // already playing
        let events = engine.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::StateChanged { .. })));
    }
}
