//! Volume control
//!
//! Linear volume in `[0, 1]` with a mute switch that preserves the level.

use cadenza_core::DEFAULT_VOLUME;

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// Out-of-range levels are clamped; NaN falls back to the default.
    pub fn new(level: f32) -> Self {
        let level = if level.is_nan() {
            DEFAULT_VOLUME
        } else {
            level.clamp(0.0, 1.0)
        };
        Self {
            level,
            muted: false,
        }
    }

    /// Set volume level, clamped into `[0, 1]`.
    ///
    /// Any audible level clears mute. NaN is ignored. Returns `true` if the
    /// stored level changed.
    pub fn set_level(&mut self, level: f32) -> bool {
        if level.is_nan() {
            return false;
        }
        let level = level.clamp(0.0, 1.0);
        if level > 0.0 {
            self.muted = false;
        }
        let changed = level != self.level;
        self.level = level;
        changed
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the output should actually use (0.0 when muted)
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}
