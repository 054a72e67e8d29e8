//! Playback events
//!
//! The engine is single-writer and never calls out directly; everything the
//! outside world needs to react to is buffered as an event and drained by the
//! owning composition root on its own cadence. This keeps ordering auditable:
//! events appear in exactly the order the mutations happened.

use crate::types::{PlaybackState, Track};
use serde::{Deserialize, Serialize};

/// Generation token for an outstanding load
///
/// Handed out by `load_track` and checked by `complete_load`; a completion
/// carrying a stale generation is discarded without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadGeneration(pub u64);

/// Events emitted by the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// The "current" identity changed (None = current cleared)
    TrackChanged {
        /// Id of the new current track
        track_id: Option<String>,
    },

    /// A remote track needs asynchronous resolution
    ///
    /// The composition root resolves the source off the command context and
    /// reports back through `complete_load` with this generation.
    LoadRequested {
        /// The track to resolve
        track: Track,
        /// Token to pass back to `complete_load`
        generation: LoadGeneration,
    },

    /// Progress sample (rate-bounded; only emitted past the epsilon)
    PositionChanged {
        /// Current position in milliseconds
        position_ms: u64,
        /// Track duration in milliseconds
        duration_ms: u64,
    },

    /// The current track played to its natural end
    TrackFinished {
        /// Id of the finished track
        track_id: String,
    },

    /// A crossfade overlap began
    CrossfadeStarted {
        /// Outgoing track id
        from_track_id: String,
        /// Incoming track id
        to_track_id: String,
        /// Overlap length in milliseconds
        duration_ms: u64,
    },

    /// The overlap completed and the incoming player was promoted
    CrossfadeCompleted,

    /// A competing command cancelled the overlap; outgoing restored
    CrossfadeCancelled,

    /// Queue contents or ordering changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Master volume or mute changed
    VolumeChanged {
        /// New level (0.0 - 1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// A non-fatal error, surfaced for display
    Error {
        /// Human-readable message
        message: String,
    },
}
