//! Playback events
//!
//! Typed notifications the presentation layer drains after driving the
//! session, used to keep UI state in sync without polling every field.

use crate::types::SessionState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Session state changed
    StateChanged {
        /// The new state
        state: SessionState,
    },

    /// The current item changed
    ItemChanged {
        /// ID of the new current item
        item_id: String,
        /// ID of the previous item (if any)
        previous_item_id: Option<String>,
    },

    /// Position or duration update from the element
    PositionUpdate {
        /// Current position
        position: Duration,
        /// Total duration, once metadata resolved
        duration: Option<Duration>,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Level (0.0 to 1.0)
        level: f32,
        /// Whether the mute flag is set
        muted: bool,
    },

    /// Queue contents or order changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Playback failed and the session degraded
    PlaybackFailed {
        /// Failure reason
        message: String,
    },
}
