//! Crossfade settings and the active overlap session
//!
//! A crossfade is a timed dual-player overlap: the incoming player starts at
//! gain zero while the outgoing one is still audible, and each progress tick
//! re-ramps both gains until the handoff completes. The session is a tagged
//! value (absent or fully populated), so "two live players outside an overlap
//! window" cannot be represented.

use crate::player::OutputPlayer;
use crate::types::Track;
use std::f32::consts::PI;
use std::time::{Duration, Instant};

/// Fade curve applied to the volume ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeCurve {
    /// Straight-line ramp
    ///
    /// **Note**: linear crossfades have a 3dB loudness dip at the midpoint.
    /// For music prefer `EqualPower`.
    Linear,

    /// Slow start, fast middle, slow end
    SCurve,

    /// Constant perceived loudness across the overlap (default)
    #[default]
    EqualPower,
}

impl FadeCurve {
    /// Gain multiplier at a normalized ramp position
    ///
    /// # Arguments
    /// * `position` - 0.0 to 1.0, clamped
    /// * `fade_out` - true for the outgoing side, false for the incoming one
    #[inline]
    pub fn gain_at(&self, position: f32, fade_out: bool) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let t = if fade_out { 1.0 - position } else { position };

        match self {
            FadeCurve::Linear => t,
            FadeCurve::SCurve => (1.0 - (PI * t).cos()) * 0.5,
            // sin²(x) + cos²(x) = 1, so the summed power stays constant
            FadeCurve::EqualPower => (t * PI * 0.5).sin(),
        }
    }
}

/// Crossfade configuration
#[derive(Debug, Clone)]
pub struct CrossfadeSettings {
    /// Whether crossfade is enabled
    pub enabled: bool,

    /// Overlap duration (max 10s)
    pub duration: Duration,

    /// Fade curve type
    pub curve: FadeCurve,
}

impl Default for CrossfadeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            duration: Duration::from_secs(3),
            curve: FadeCurve::EqualPower,
        }
    }
}

impl CrossfadeSettings {
    /// Enabled settings with a specific overlap duration
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            enabled: true,
            duration: duration.min(Duration::from_secs(10)),
            curve: FadeCurve::EqualPower,
        }
    }
}

/// An in-flight crossfade overlap
///
/// Owns both output primitives for the lifetime of the overlap. Destroyed
/// atomically on completion (incoming promoted) or cancellation (outgoing
/// restored, incoming discarded); never persisted.
pub struct ActiveCrossfade {
    /// The ending track's player, ramping down
    pub outgoing: Box<dyn OutputPlayer>,

    /// The next track's player, ramping up
    pub incoming: Box<dyn OutputPlayer>,

    /// Metadata of the incoming track
    pub incoming_track: Track,

    /// When the overlap began
    pub started_at: Instant,

    /// Overlap length, captured at session start
    pub fade_duration: Duration,

    /// Last computed ramp progress, kept so volume changes between ticks can
    /// re-derive both gains without a timestamp
    pub progress: f32,
}

impl ActiveCrossfade {
    /// Normalized ramp progress at `now`, clamped to `[0, 1]`
    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.fade_duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.fade_duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Apply the ramp to both players at `progress`, scaled by the master gain
    pub fn apply_gains(&mut self, progress: f32, master_gain: f32, curve: FadeCurve) {
        self.progress = progress;
        self.outgoing
            .set_gain(curve.gain_at(progress, true) * master_gain);
        self.incoming
            .set_gain(curve.gain_at(progress, false) * master_gain);
    }
}
