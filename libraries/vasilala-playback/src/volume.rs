//! Volume control
//!
//! Level is a linear `[0.0, 1.0]` written through to the media element.
//! The `muted` flag is independent of the level and owned solely by the
//! mute operations: `set_level(0.0)` renders as muted for display but never
//! flips the flag, so unmuting always restores the stored level.

/// Volume state for a playback session
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    level: f32,
    muted: bool,
}

impl Volume {
    /// Create with an initial level, clamped to `[0.0, 1.0]`
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set the level, clamped to `[0.0, 1.0]`
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    /// Current level (preserved while muted)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle the mute flag
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Set the mute flag directly
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Whether the mute flag is set
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether output is silent, by flag or by a zero level
    pub fn is_effectively_muted(&self) -> bool {
        self.muted || self.level == 0.0
    }

    /// Gain written to the media element
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
        Self::new(0.8)
    }
}
