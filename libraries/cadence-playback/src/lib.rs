//! Cadence - Playback Transport and Queue Engine
//!
//! Platform-agnostic playback orchestration for Cadence.
//!
//! This crate provides:
//! - Transport state machine (Idle, Loading, Playing, Paused, Stopped)
//! - Ordered play queue with cursor, shuffle and repeat modes
//! - Crossfade scheduling (timed dual-player overlap, local-to-local)
//! - Master volume (logarithmic, 0.0-1.0, mute/unmute)
//! - Generation-tokened asynchronous loads (stale completions discarded)
//! - Change-suppressed now-playing snapshots for OS media surfaces
//!
//! # Architecture
//!
//! `cadence-playback` does no decoding, buffering or DSP of its own. It
//! drives opaque platform "players" through the [`OutputPlayer`] trait and
//! asks a [`PlayerFactory`] for local-file players; network-stream players
//! are built by the composition root after an async source resolution (see
//! the resolver crate) and handed in through
//! [`PlaybackEngine::complete_load`].
//!
//! The engine is single-writer: all mutation happens through `&mut self` on
//! one logical command context, and everything the outside world needs to
//! react to comes out as buffered [`PlaybackEvent`]s in mutation order.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{
//!     EngineConfig, OutputPlayer, PlaybackEngine, PlayerFactory, Result, Track, TrackSource,
//! };
//! use std::path::{Path, PathBuf};
//! use std::time::Duration;
//!
//! # struct NullPlayer;
//! # impl OutputPlayer for NullPlayer {
//! #     fn play(&mut self) -> Result<()> { Ok(()) }
//! #     fn pause(&mut self) -> Result<()> { Ok(()) }
//! #     fn stop(&mut self) {}
//! #     fn seek(&mut self, _: Duration) -> Result<()> { Ok(()) }
//! #     fn set_gain(&mut self, _: f32) {}
//! #     fn position(&self) -> Duration { Duration::ZERO }
//! #     fn duration(&self) -> Duration { Duration::from_secs(180) }
//! #     fn is_finished(&self) -> bool { false }
//! # }
//! struct MyPlatform;
//!
//! impl PlayerFactory for MyPlatform {
//!     fn local(&self, path: &Path) -> Result<Box<dyn OutputPlayer>> {
//!         // Open the file with the platform decoder
//! #       let _ = path;
//! #       Ok(Box::new(NullPlayer))
//!     }
//! }
//!
//! let mut engine = PlaybackEngine::new(Box::new(MyPlatform), EngineConfig::default());
//!
//! let track = Track {
//!     id: "track1".to_string(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     duration: Duration::from_secs(180),
//!     source: TrackSource::Local(PathBuf::from("/music/song.mp3")),
//! };
//!
//! engine.play_now(track, None);
//! engine.set_volume(0.8);
//!
//! // Pump on the UI cadence: drives crossfades, auto-advance and progress
//! engine.tick();
//! for event in engine.drain_events() {
//!     // forward to UI / OS media controls
//! #   let _ = event;
//! }
//! ```
//!
//! # Example: Asynchronous Remote Loads
//!
//! ```rust,ignore
//! use cadence_playback::{PlaybackEvent, PlaybackError};
//!
//! for event in engine.drain_events() {
//!     if let PlaybackEvent::LoadRequested { track, generation } = event {
//!         // Resolve off the command context, then report back on it
//!         let result = resolve_and_open(&track);
//!         engine.complete_load(generation, result);
//!     }
//! }
//! ```

mod crossfade;
mod engine;
mod error;
mod events;
mod now_playing;
mod player;
mod queue;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use crossfade::{CrossfadeSettings, FadeCurve};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{LoadGeneration, PlaybackEvent};
pub use now_playing::{NowPlaying, NowPlayingPublisher};
pub use player::{OutputPlayer, PlayerFactory};
pub use types::{EngineConfig, PlaybackState, RepeatMode, Track, TrackSource};
