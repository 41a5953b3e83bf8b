//! Error types for playback session management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No item is currently loaded
    #[error("No item loaded")]
    NoItemLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Media element rejected an operation (autoplay policy, decode error)
    #[error("Media element error: {0}")]
    Element(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
