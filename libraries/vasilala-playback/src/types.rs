//! Core types for playback session management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable unit in the queue
///
/// Carries everything the session needs for playback and display. Both the
/// music player and the video feed produce these from their own entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Entity identifier (track or post ID)
    pub id: String,

    /// Display title
    pub title: String,

    /// Artist or author name
    pub artist: String,

    /// Known media duration, if the catalog has one
    pub duration: Option<Duration>,

    /// Streaming URL handed to the media element
    pub media_url: String,
}

/// Playback session state
///
/// `Loading` covers the window between assigning a source and the element
/// reporting progress; `Ended` is the transient state entered when the
/// element reports end-of-media, before queue resolution picks the next
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No current item
    Idle,

    /// Source assigned, element has not started reporting progress
    Loading,

    /// Playing
    Playing,

    /// Paused mid-item
    Paused,

    /// Element reported end-of-media
    Ended,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the entire queue
    All,

    /// Replay the current item forever
    One,
}

/// Previous-track policy
///
/// The two playback surfaces resolve "previous" differently; both are kept
/// as explicit strategies rather than silently merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviousPolicy {
    /// Step the queue cursor back one position
    QueuePointer,

    /// Pop the most recently played item off the history stack
    HistoryStack,
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// "Previous" restarts the current item when the position exceeds this
    /// threshold (default: 3 seconds)
    pub previous_restart_threshold: Duration,

    /// Initial volume, 0.0 to 1.0 (default: 0.8)
    pub initial_volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Whether the queue starts shuffled (default: false)
    pub shuffle: bool,

    /// Previous-track policy (default: QueuePointer)
    pub previous_policy: PreviousPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            previous_restart_threshold: Duration::from_secs(3),
            initial_volume: 0.8,
            repeat: RepeatMode::Off,
            shuffle: false,
            previous_policy: PreviousPolicy::QueuePointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 50);
        assert_eq!(config.previous_restart_threshold, Duration::from_secs(3));
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.previous_policy, PreviousPolicy::QueuePointer);
        assert!(!config.shuffle);
    }
}
