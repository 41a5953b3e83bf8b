/// Core error types for the Vasílala client
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the Vasílala client
#[derive(Error, Debug)]
pub enum CoreError {
    /// A document from the remote store failed schema validation
    #[error("Decode error in '{collection}': {reason}")]
    Decode {
        /// Collection the document came from
        collection: String,
        /// What was missing or mistyped
        reason: String,
    },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. "track")
        entity: String,
        /// Entity identifier
        id: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/transport error from the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication required or rejected
    #[error("Auth error: {0}")]
    Auth(String),

    /// Gateway rate limit hit
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds the gateway asked us to back off
        retry_after_secs: u64,
    },

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create a decode error
    pub fn decode(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }
}
