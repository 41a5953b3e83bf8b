//! Error types for the gateway client.

use thiserror::Error;
use vasilala_core::CoreError;

/// Errors that can occur when talking to the hosted backend.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Authentication required but no token available (or token rejected)
    #[error("Authentication required")]
    AuthRequired,

    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid gateway URL
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse a backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Document not found
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// Collection queried
        collection: String,
        /// Document ID
        id: String,
    },

    /// Rate limited by the backend
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to back off
        retry_after_secs: u64,
    },

    /// Backend is offline or unreachable
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    /// Upload rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<GatewayError> for CoreError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AuthRequired => CoreError::auth("authentication required"),
            GatewayError::AuthFailed(reason) => CoreError::auth(reason),
            GatewayError::TokenRefreshFailed(reason) => CoreError::auth(reason),
            GatewayError::NotFound { collection, id } => CoreError::not_found(collection, id),
            GatewayError::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            GatewayError::Validation(reason) => CoreError::Validation(reason),
            other => CoreError::network(other.to_string()),
        }
    }
}

/// Result type for gateway client operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
