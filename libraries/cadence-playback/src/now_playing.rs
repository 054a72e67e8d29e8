//! Now-playing snapshot and publisher
//!
//! Pure projection of transport + queue state into the shape consumed by OS
//! media controls and the widget surface. Write-only from the consumers'
//! perspective; nothing here can mutate the engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable snapshot of what is currently audible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Track title
    pub title: String,

    /// Track artist
    pub artist: String,

    /// Whether audio is audible right now
    pub is_playing: bool,

    /// Playback position
    pub position: Duration,

    /// Track duration
    pub duration: Duration,

    /// Optional artwork bytes for lock-screen display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Vec<u8>>,
}

/// Change-suppressing snapshot publisher
///
/// Re-emits only when something display-relevant moved: track identity,
/// playing flag, or position beyond the epsilon. Keeps OS surfaces and the
/// polled widget file from churning on negligible updates.
#[derive(Debug, Default)]
pub struct NowPlayingPublisher {
    last: Option<NowPlaying>,
    epsilon: Duration,
}

impl NowPlayingPublisher {
    /// Create a publisher with the given position epsilon
    pub fn new(epsilon: Duration) -> Self {
        Self {
            last: None,
            epsilon,
        }
    }

    /// Offer a fresh snapshot
    ///
    /// Returns true when it differs enough from the last published one to be
    /// worth forwarding; the accepted snapshot is then available via `last`.
    pub fn publish(&mut self, snapshot: Option<NowPlaying>) -> bool {
        let changed = match (&self.last, &snapshot) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(prev), Some(next)) => {
                prev.title != next.title
                    || prev.artist != next.artist
                    || prev.is_playing != next.is_playing
                    || prev.duration != next.duration
                    || position_delta(prev.position, next.position) > self.epsilon
            }
        };

        if changed {
            self.last = snapshot;
        }
        changed
    }

    /// The most recently published snapshot
    pub fn last(&self) -> Option<&NowPlaying> {
        self.last.as_ref()
    }
}

fn position_delta(a: Duration, b: Duration) -> Duration {
    if a > b {
        a - b
    } else {
        b - a
    }
}
