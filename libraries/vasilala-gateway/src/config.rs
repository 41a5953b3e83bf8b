//! Client configuration
//!
//! Layered loading: built-in defaults, then an optional `vasilala.toml`
//! file, then `VASILALA_*` environment variables (double underscore as the
//! nesting separator, e.g. `VASILALA_GATEWAY__BASE_URL`).

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use vasilala_core::UploadLimits;

/// Connection parameters and tokens for the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the backend (e.g. `https://api.vasilala.app`)
    pub base_url: String,

    /// Project API key sent with every request
    pub api_key: Option<String>,

    /// Bearer access token for the signed-in user
    pub access_token: Option<String>,

    /// Refresh token used on 401
    pub refresh_token: Option<String>,
}

impl GatewayConfig {
    /// Create a config for the given base URL with no tokens
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            access_token: None,
            refresh_token: None,
        }
    }
}

/// Full client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend connection parameters
    pub gateway: GatewayConfig,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Page size for cursor-paginated loads
    pub page_size: usize,

    /// Maximum feed video upload size in megabytes
    pub max_video_upload_mb: usize,

    /// Maximum track audio upload size in megabytes
    pub max_audio_upload_mb: usize,

    /// Maximum image upload size in megabytes
    pub max_image_upload_mb: usize,
}

impl ClientConfig {
    /// Load configuration from defaults, optional file, and environment
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .set_default("gateway.base_url", "https://api.vasilala.app")?
            .set_default("request_timeout_secs", 30)?
            .set_default("connect_timeout_secs", 10)?
            .set_default("page_size", 20)?
            .set_default("max_video_upload_mb", 200)?
            .set_default("max_audio_upload_mb", 50)?
            .set_default("max_image_upload_mb", 10)?
            .add_source(File::with_name("vasilala").required(false))
            .add_source(Environment::with_prefix("VASILALA").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Upload limits derived from the configured megabyte caps
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_video_bytes: self.max_video_upload_mb * 1024 * 1024,
            max_audio_bytes: self.max_audio_upload_mb * 1024 * 1024,
            max_image_bytes: self.max_image_upload_mb * 1024 * 1024,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::new("https://api.vasilala.app"),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            page_size: 20,
            max_video_upload_mb: 200,
            max_audio_upload_mb: 50,
            max_image_upload_mb: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(
            config.upload_limits().max_video_bytes,
            200 * 1024 * 1024
        );
    }

    #[test]
    fn load_fills_defaults() {
        let config = ClientConfig::load().expect("defaults load");
        assert_eq!(config.gateway.base_url, "https://api.vasilala.app");
        assert!(config.gateway.access_token.is_none());
    }
}
