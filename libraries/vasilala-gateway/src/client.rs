//! Main gateway client.

use crate::config::{ClientConfig, GatewayConfig};
use crate::error::{GatewayError, Result};
use reqwest::{Client, Response};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;
use vasilala_core::{AuthSession, SessionCallback, UploadLimits};

/// HTTP client for the Vasílala hosted backend.
///
/// One client per process: it owns the HTTP connection pool, the token
/// state, and the session-change callbacks. The gateway traits consumed by
/// the stores ([`vasilala_core::DocumentGateway`],
/// [`vasilala_core::ObjectStore`], [`vasilala_core::IdentityGateway`]) are
/// all implemented on this type.
///
/// # Example
///
/// ```ignore
/// use vasilala_gateway::{GatewayClient, GatewayConfig};
///
/// let client = GatewayClient::new(GatewayConfig::new("https://api.vasilala.app"))?;
/// let session = client.sign_in("ana@example.com", "secret").await?;
/// println!("signed in as {}", session.profile.display_name);
/// ```
pub struct GatewayClient {
    pub(crate) http: Client,
    pub(crate) config: Arc<RwLock<GatewayConfig>>,
    pub(crate) upload_limits: UploadLimits,
    session_callbacks: Mutex<Vec<SessionCallback>>,
}

impl GatewayClient {
    /// Create a client with default timeouts.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_timeouts(config, Duration::from_secs(30), Duration::from_secs(10))
    }

    /// Create a client from a loaded [`ClientConfig`].
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        let mut client = Self::with_timeouts(
            config.gateway.clone(),
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )?;
        client.upload_limits = config.upload_limits();
        Ok(client)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(
        config: GatewayConfig,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(GatewayError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(GatewayError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized = GatewayConfig {
            base_url,
            api_key: config.api_key,
            access_token: config.access_token,
            refresh_token: config.refresh_token,
        };

        // Project API key rides on every request as a default header
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(api_key) = &normalized.api_key {
            let value = reqwest::header::HeaderValue::from_str(api_key).map_err(|_| {
                GatewayError::Config("API key contains invalid header characters".into())
            })?;
            headers.insert("x-api-key", value);
        }

        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .default_headers(headers)
            .user_agent(format!("Vasilala/{} (client)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized)),
            upload_limits: UploadLimits::default(),
            session_callbacks: Mutex::new(Vec::new()),
        })
    }

    /// Get the backend base URL.
    pub async fn base_url(&self) -> String {
        self.config.read().await.base_url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Set tokens directly (e.g. from stored credentials).
    pub async fn set_tokens(&self, access_token: String, refresh_token: Option<String>) {
        let mut config = self.config.write().await;
        config.access_token = Some(access_token);
        config.refresh_token = refresh_token;
    }

    /// Get the current tokens.
    pub async fn tokens(&self) -> (Option<String>, Option<String>) {
        let config = self.config.read().await;
        (config.access_token.clone(), config.refresh_token.clone())
    }

    /// Clear stored tokens.
    pub async fn clear_tokens(&self) {
        let mut config = self.config.write().await;
        config.access_token = None;
        config.refresh_token = None;
    }

    /// Current access token, or `AuthRequired`.
    pub(crate) async fn access_token(&self) -> Result<String> {
        self.config
            .read()
            .await
            .access_token
            .clone()
            .ok_or(GatewayError::AuthRequired)
    }

    /// Refresh the access token using the refresh token.
    pub async fn refresh_tokens(&self) -> Result<()> {
        let (url, refresh_token) = {
            let config = self.config.read().await;
            let refresh_token = config
                .refresh_token
                .clone()
                .ok_or(GatewayError::AuthRequired)?;
            (format!("{}/api/auth/refresh", config.base_url), refresh_token)
        };

        debug!("refreshing access token");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::TokenRefreshFailed(format!(
                "status {status}: {message}"
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("token response: {e}")))?;

        let mut config = self.config.write().await;
        config.access_token = Some(tokens.access_token);
        if tokens.refresh_token.is_some() {
            config.refresh_token = tokens.refresh_token;
        }
        info!("access token refreshed");

        Ok(())
    }

    /// Execute an operation with automatic token refresh on 401.
    ///
    /// If the operation fails with `AuthRequired`, attempts to refresh the
    /// token and retries once.
    pub async fn with_auto_refresh<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        match operation().await {
            Ok(result) => Ok(result),
            Err(GatewayError::AuthRequired) => {
                warn!("token rejected, attempting refresh");
                self.refresh_tokens().await?;
                operation().await
            }
            Err(e) => Err(e),
        }
    }

    /// Register a session-change callback.
    pub(crate) fn register_session_callback(&self, callback: SessionCallback) {
        self.session_callbacks.lock().unwrap().push(callback);
    }

    /// Notify every registered callback of a session change.
    pub(crate) fn notify_session(&self, session: Option<AuthSession>) {
        for callback in self.session_callbacks.lock().unwrap().iter() {
            callback(session.clone());
        }
    }
}

/// Token pair returned by the auth endpoints.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Map a non-success response to an error.
///
/// 404 is handled at call sites that know the collection/ID context.
pub(crate) async fn response_error(response: Response) -> GatewayError {
    let status = response.status().as_u16();

    if status == 401 {
        return GatewayError::AuthRequired;
    }
    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or(60);
        return GatewayError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    let message = response.text().await.unwrap_or_default();
    GatewayError::ServerError { status, message }
}

/// Classify transport errors: connect/timeout failures are "unreachable".
pub(crate) fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_connect() || err.is_timeout() {
        GatewayError::Unreachable(err.to_string())
    } else {
        GatewayError::Request(err)
    }
}
