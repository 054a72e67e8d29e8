//! Opaque output primitive traits
//!
//! The engine does no decoding or DSP of its own; it drives platform-provided
//! "players" through these traits. A local-file player and a network-stream
//! player both implement [`OutputPlayer`]; the engine never cares which kind
//! it holds, except when scheduling a crossfade (local-to-local only).

use crate::error::Result;
use std::path::Path;
use std::time::Duration;

/// A platform audio output primitive
///
/// At most one of these is live at a time, except during a crossfade overlap
/// window where the engine transiently drives two.
pub trait OutputPlayer: Send {
    /// Start or resume audio output
    fn play(&mut self) -> Result<()>;

    /// Pause audio output, keeping position
    fn pause(&mut self) -> Result<()>;

    /// Release the underlying output resources
    fn stop(&mut self);

    /// Seek to a position
    ///
    /// Exact for local files; best-effort for network streams, where the
    /// reported position after the seek may differ from the requested one.
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Apply a linear gain multiplier (0.0 - 1.0)
    fn set_gain(&mut self, gain: f32);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Total duration, once known
    fn duration(&self) -> Duration;

    /// True once the track has played to its end
    fn is_finished(&self) -> bool;

    /// A decode/playback failure, if one occurred
    ///
    /// The engine treats this the same as the track ending.
    fn failure(&self) -> Option<String> {
        None
    }
}

/// Synchronous construction of local-file players
///
/// Local sources are always synchronously available, which is what lets the
/// crossfade scheduler spin up the incoming player inside a progress tick.
/// Network-stream players are built by the composition root after an async
/// resolution and handed in through `PlaybackEngine::complete_load`.
pub trait PlayerFactory: Send {
    /// Create a player for a local file
    fn local(&self, path: &Path) -> Result<Box<dyn OutputPlayer>>;
}

/// Scripted player for unit tests
///
/// Position only moves when the test moves it, which keeps tick-driven
/// engine behavior deterministic.
#[cfg(test)]
pub(crate) struct FakePlayer {
    pub duration: Duration,
    pub position: Duration,
    pub playing: bool,
    pub gain: f32,
    pub stopped: bool,
    pub failure: Option<String>,
}

#[cfg(test)]
impl FakePlayer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            position: Duration::ZERO,
            playing: false,
            gain: 1.0,
            stopped: false,
            failure: None,
        }
    }
}

#[cfg(test)]
impl OutputPlayer for FakePlayer {
    fn play(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.stopped = true;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.position = position.min(self.duration);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.position >= self.duration
    }

    fn failure(&self) -> Option<String> {
        self.failure.clone()
    }
}
