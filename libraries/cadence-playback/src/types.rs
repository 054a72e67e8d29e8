//! Core types for the playback engine

use crate::crossfade::CrossfadeSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A playable item in the queue
///
/// Immutable identity plus playability descriptor. Track references are
/// created by the import/search collaborators and handed to the engine by
/// value; the engine never fabricates one itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Display artist
    pub artist: String,

    /// Track duration. Authoritative for local files; provisional for remote
    /// tracks until the output primitive confirms it.
    pub duration: Duration,

    /// Where the audio comes from
    pub source: TrackSource,
}

/// Origin of a track's audio data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackSource {
    /// File on local storage
    Local(PathBuf),

    /// Identifier resolved on demand against the streaming backend mirrors
    Remote(String),
}

impl TrackSource {
    /// True for locally stored audio
    pub fn is_local(&self) -> bool {
        matches!(self, TrackSource::Local(_))
    }
}

/// Transport state
///
/// The single authoritative answer to "what is the engine doing right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing loaded since startup (or after a failed load)
    Idle,

    /// A load has been dispatched and its resolution is outstanding
    Loading,

    /// Audio is audible
    Playing,

    /// Paused mid-track
    Paused,

    /// Playback explicitly halted; output primitive released
    Stopped,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track only
    One,
}

/// Configuration for the playback engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initial master volume (0.0 - 1.0, default: 0.8)
    pub volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Crossfade settings
    pub crossfade: CrossfadeSettings,

    /// Elapsed time past which `retreat` restarts the current track instead
    /// of moving to the previous entry (default: 3s)
    pub restart_threshold: Duration,

    /// Minimum position delta before a new progress sample is republished
    /// (default: 250ms)
    pub position_epsilon: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            repeat: RepeatMode::Off,
            crossfade: CrossfadeSettings::default(),
            restart_threshold: Duration::from_secs(3),
            position_epsilon: Duration::from_millis(250),
        }
    }
}
