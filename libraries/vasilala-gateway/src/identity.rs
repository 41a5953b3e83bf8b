//! Identity operations.
//!
//! Sign-up, sign-in, and sign-out against the backend auth endpoints.
//! Successful auth stores the token pair on the client and notifies every
//! registered session-change callback; sign-out is best-effort remotely but
//! always clears local state.

use crate::client::{response_error, transport_error, GatewayClient};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};
use vasilala_core::{
    AuthSession, Document, FromDocument, IdentityGateway, SessionCallback, UserProfile,
};

/// Auth endpoint response: tokens plus the user's profile document.
#[derive(Debug, serde::Deserialize)]
struct SessionResponse {
    access_token: String,
    refresh_token: Option<String>,
    user: Value,
}

impl GatewayClient {
    async fn do_auth(&self, path: &str, body: Value) -> Result<AuthSession> {
        let url = format!("{}{path}", self.base_url().await);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::AuthFailed(message));
        }
        if !status.is_success() {
            return Err(response_error(response).await);
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("auth response: {e}")))?;

        let profile_doc = Document::from_value(session.user)
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;
        let profile = UserProfile::from_document(&profile_doc)
            .map_err(|e| GatewayError::ParseError(e.to_string()))?;

        self.set_tokens(session.access_token, session.refresh_token)
            .await;

        Ok(AuthSession::new(profile))
    }
}

#[async_trait]
impl IdentityGateway for GatewayClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> vasilala_core::Result<AuthSession> {
        let body = json!({
            "email": email,
            "password": password,
            "display_name": display_name,
        });
        let session = self
            .do_auth("/api/auth/signup", body)
            .await
            .map_err(vasilala_core::CoreError::from)?;

        info!(user_id = %session.user_id, "account created");
        self.notify_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> vasilala_core::Result<AuthSession> {
        let body = json!({ "email": email, "password": password });
        let session = self
            .do_auth("/api/auth/login", body)
            .await
            .map_err(vasilala_core::CoreError::from)?;

        info!(user_id = %session.user_id, "signed in");
        self.notify_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> vasilala_core::Result<()> {
        // Best effort remotely; local state is always cleared
        if let Ok(token) = self.access_token().await {
            let url = format!("{}/api/auth/logout", self.base_url().await);
            if let Err(error) = self.http.post(&url).bearer_auth(token).send().await {
                warn!(%error, "remote sign-out failed, clearing local session anyway");
            }
        }

        self.clear_tokens().await;
        self.notify_session(None);
        info!("signed out");
        Ok(())
    }

    fn on_session_change(&self, callback: SessionCallback) {
        self.register_session_callback(callback);
    }
}
