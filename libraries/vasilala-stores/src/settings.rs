//! Settings store
//!
//! One settings document per user, keyed by the user ID. Other components
//! (e.g. playback picking its initial volume) read this store's snapshot;
//! only the store itself mutates it.

use crate::optimistic::spawn_write;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use vasilala_core::gateway::collections;
use vasilala_core::{
    CoreError, Document, DocumentGateway, FromDocument, Result, UserId,
};

/// Per-user preference document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Owning user
    pub user_id: UserId,

    /// Preferred playback volume, 0.0 to 1.0
    pub preferred_volume: f32,

    /// Whether feed videos start automatically
    pub autoplay: bool,

    /// Whether the account is private
    pub private_account: bool,

    /// BCP 47 locale tag
    pub locale: String,
}

impl UserSettings {
    /// Defaults for a user with no stored settings document
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            preferred_volume: 0.8,
            autoplay: true,
            private_account: false,
            locale: "en".to_string(),
        }
    }
}

impl FromDocument for UserSettings {
    const COLLECTION: &'static str = collections::SETTINGS;

    fn from_document(doc: &Document) -> Result<Self> {
        let err = |reason| CoreError::decode(Self::COLLECTION, reason);

        let preferred_volume = doc.float_field("preferred_volume").map_err(err)? as f32;

        Ok(UserSettings {
            user_id: UserId::new(doc.str_field("user_id").map_err(err)?),
            preferred_volume: preferred_volume.clamp(0.0, 1.0),
            autoplay: doc.flag_field("autoplay", true).map_err(err)?,
            private_account: doc.flag_field("private_account", false).map_err(err)?,
            locale: doc.str_field("locale").map_err(err)?.to_string(),
        })
    }
}

#[derive(Default)]
struct SettingsState {
    settings: Option<UserSettings>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

/// Immutable view of the settings domain
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsSnapshot {
    /// Loaded settings, if any
    pub settings: Option<UserSettings>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Last fetch error, if any
    pub error: Option<String>,
}

/// Domain store for user settings
pub struct SettingsStore {
    gateway: Arc<dyn DocumentGateway>,
    state: Arc<RwLock<SettingsState>>,
    snapshot_tx: watch::Sender<SettingsSnapshot>,
}

impl SettingsStore {
    /// Create a settings store over the given gateway
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        let (snapshot_tx, _) = watch::channel(SettingsSnapshot::default());
        Self {
            gateway,
            state: Arc::new(RwLock::new(SettingsState::default())),
            snapshot_tx,
        }
    }

    /// Read-only snapshot subscription for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<SettingsSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the settings document for `user_id`
    ///
    /// A missing document yields the defaults; duplicate calls while a
    /// fetch is in flight are no-ops.
    pub async fn load(&self, user_id: &UserId) {
        let generation = {
            let mut state = self.state.write().await;
            if state.loading {
                return;
            }
            state.loading = true;
            state.error = None;
            state.generation += 1;
            state.generation
        };
        self.publish().await;

        let result = self
            .gateway
            .get(collections::SETTINGS, user_id.as_str())
            .await;

        {
            let mut state = self.state.write().await;
            if state.generation != generation {
                return;
            }
            state.loading = false;
            match result {
                Ok(document) => match UserSettings::from_document(&document) {
                    Ok(settings) => state.settings = Some(settings),
                    Err(error) => state.error = Some(error.to_string()),
                },
                Err(CoreError::NotFound { .. }) => {
                    state.settings = Some(UserSettings::default_for(user_id.clone()));
                }
                Err(error) => state.error = Some(error.to_string()),
            }
        }
        self.publish().await;
    }

    /// Current settings, if loaded
    pub async fn settings(&self) -> Option<UserSettings> {
        self.state.read().await.settings.clone()
    }

    /// Replace the settings document
    ///
    /// Applied locally first; restored to the previous value if the remote
    /// write fails.
    pub async fn update(&self, mut settings: UserSettings) -> Result<JoinHandle<()>> {
        settings.preferred_volume = settings.preferred_volume.clamp(0.0, 1.0);
        if settings.locale.trim().is_empty() {
            return Err(CoreError::validation("locale must not be empty"));
        }

        let document = Document::from_entity(&settings)?;
        let key = settings.user_id.as_str().to_string();

        let previous = {
            let mut state = self.state.write().await;
            state.settings.replace(settings)
        };
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let remote =
            async move { gateway.update(collections::SETTINGS, &key, document).await };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let compensate = async move {
            let mut state = state.write().await;
            state.settings = previous;
            let snapshot = SettingsSnapshot {
                settings: state.settings.clone(),
                loading: state.loading,
                error: state.error.clone(),
            };
            drop(state);
            snapshot_tx.send_replace(snapshot);
        };

        Ok(spawn_write("settings.update", remote, compensate))
    }

    /// Convenience: update only the preferred volume
    pub async fn set_preferred_volume(&self, volume: f32) -> Result<JoinHandle<()>> {
        let mut settings = self
            .settings()
            .await
            .ok_or_else(|| CoreError::invalid_input("settings not loaded"))?;
        settings.preferred_volume = volume;
        self.update(settings).await
    }

    async fn publish(&self) {
        let state = self.state.read().await;
        let snapshot = SettingsSnapshot {
            settings: state.settings.clone(),
            loading: state.loading,
            error: state.error.clone(),
        };
        drop(state);
        self.snapshot_tx.send_replace(snapshot);
    }
}
