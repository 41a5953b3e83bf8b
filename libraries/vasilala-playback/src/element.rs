//! Media element abstraction
//!
//! The session drives a platform-native audio/video element through this
//! trait and learns about progress only through the events the element
//! emits. Position and duration are derived state: a `play` or
//! `set_position` call is an intent, not a synchronous state change.

use crate::error::Result;
use std::time::Duration;

/// Imperative surface of a native media element
#[cfg_attr(test, mockall::automock)]
pub trait MediaElement: Send {
    /// Assign a new media source
    fn set_source(&mut self, url: &str);

    /// Begin or resume playback
    ///
    /// Fallible: autoplay policy or a decode failure can reject playback
    /// asynchronously-in-spirit; implementations surface that here.
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Write through a new position
    fn set_position(&mut self, position: Duration);

    /// Set the output gain (0.0 to 1.0)
    fn set_volume(&mut self, gain: f32);
}

/// Events emitted by the media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Source metadata resolved
    LoadedMetadata {
        /// Total media duration
        duration: Duration,
    },

    /// Periodic progress report
    TimeUpdate {
        /// Current position
        position: Duration,
    },

    /// End of media reached
    Ended,

    /// Playback failed (decode error, network stall)
    Failed {
        /// Element-reported reason
        message: String,
    },
}
