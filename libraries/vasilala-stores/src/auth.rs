//! Auth store
//!
//! Thin stateful wrapper over the identity gateway: holds the current
//! session, republishes it on every change (including changes pushed by the
//! provider), and derives permission flags from role + verification.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use vasilala_core::{AuthSession, IdentityGateway, Result, UserId};

/// Domain store for the signed-in session
pub struct AuthStore {
    identity: Arc<dyn IdentityGateway>,
    session_tx: watch::Sender<Option<AuthSession>>,
}

impl AuthStore {
    /// Create an auth store over the given identity gateway
    ///
    /// Subscribes to provider-side session changes so a session expiring or
    /// being revoked elsewhere is reflected here without any local call.
    pub fn new(identity: Arc<dyn IdentityGateway>) -> Self {
        let (session_tx, _) = watch::channel(None);

        let tx = session_tx.clone();
        identity.on_session_change(Box::new(move |session| {
            tx.send_replace(session);
        }));

        Self {
            identity,
            session_tx,
        }
    }

    /// Read-only session subscription for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.session_tx.subscribe()
    }

    /// Register a new account and sign it in
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession> {
        let session = self.identity.sign_up(email, password, display_name).await?;
        info!(user_id = %session.user_id, "signed up");
        self.session_tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Sign in with credentials
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let session = self.identity.sign_in(email, password).await?;
        info!(user_id = %session.user_id, "signed in");
        self.session_tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Sign out
    pub async fn sign_out(&self) -> Result<()> {
        self.identity.sign_out().await?;
        self.session_tx.send_replace(None);
        info!("signed out");
        Ok(())
    }

    // === Getters (pure projections, no I/O) ===

    /// Current session, if signed in
    pub fn session(&self) -> Option<AuthSession> {
        self.session_tx.borrow().clone()
    }

    /// Signed-in user ID, if any
    pub fn user_id(&self) -> Option<UserId> {
        self.session_tx
            .borrow()
            .as_ref()
            .map(|session| session.user_id.clone())
    }

    /// Whether a session is active
    pub fn is_signed_in(&self) -> bool {
        self.session_tx.borrow().is_some()
    }

    /// Whether the signed-in user may publish tracks
    pub fn can_publish_tracks(&self) -> bool {
        self.session_tx
            .borrow()
            .as_ref()
            .is_some_and(|session| session.profile.can_publish_tracks())
    }

    /// Whether the signed-in user may create event listings
    pub fn can_publish_events(&self) -> bool {
        self.session_tx
            .borrow()
            .as_ref()
            .is_some_and(|session| session.profile.can_publish_events())
    }

    /// Whether the signed-in user may upload feed videos
    pub fn can_upload_videos(&self) -> bool {
        self.session_tx
            .borrow()
            .as_ref()
            .is_some_and(|session| session.profile.can_upload_videos())
    }
}
