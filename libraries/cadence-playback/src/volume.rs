//! Master volume with logarithmic scaling
//!
//! Volume is exposed as 0.0 - 1.0 and mapped to -60 dB .. 0 dB internally so
//! the control feels linear to human hearing.

/// Master volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0 - 1.0)
    level: f32,

    /// Mute state (preserves the level)
    muted: bool,

    /// Cached linear gain multiplier
    linear_gain: f32,
}

impl Volume {
    /// Create a new volume controller, clamping `level` to `[0, 1]`
    pub fn new(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self {
            level,
            muted: false,
            linear_gain: Self::calculate_linear_gain(level),
        }
    }

    /// Set the volume level, clamped to `[0, 1]`
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
        self.linear_gain = Self::calculate_linear_gain(self.level);
    }

    /// Current volume level (0.0 - 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute (preserves the level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute (restores the previous level)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain multiplier to hand to an output primitive
    ///
    /// Returns 0.0 when muted, otherwise the dB-mapped gain.
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.linear_gain
        }
    }

    /// Map 0.0-1.0 to -60 dB .. 0 dB, then to a linear multiplier
    fn calculate_linear_gain(level: f32) -> f32 {
        if level <= 0.0 {
            return 0.0;
        }

        let db = (level - 1.0) * 60.0;
        10.0_f32.powf(db / 20.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
