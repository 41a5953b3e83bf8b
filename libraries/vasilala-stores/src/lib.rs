//! Vasílala - Domain Stores
//!
//! In-memory state containers for every client domain: feed, music,
//! events, notifications, settings, and auth. Each store owns the snapshot
//! of one domain's entities, mediates all gateway calls for that domain,
//! and publishes immutable snapshots over a watch channel for the
//! presentation layer.
//!
//! # Contracts shared by every store
//!
//! - `load` replaces the snapshot with the first page, clears the error
//!   state, and is idempotent while a fetch is in flight (no duplicate
//!   gateway calls).
//! - `load_more` appends the next page, keyed by the last-seen entity ID.
//! - Mutations apply locally and synchronously, then fire the remote write;
//!   a failed write rolls the local change back and is logged. Counters
//!   saturate at zero.
//! - Getters are pure projections over the snapshot and perform no I/O.
//! - A failed fetch records an error string and preserves the previous
//!   snapshot; results of superseded fetches are discarded.
//!
//! # Composition
//!
//! Stores are constructed explicitly, never as process-wide singletons:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vasilala_stores::{StoreConfig, StoreSet};
//! # use vasilala_core::{DocumentGateway, IdentityGateway};
//! # fn gateways() -> (Arc<dyn DocumentGateway>, Arc<dyn IdentityGateway>) { unimplemented!() }
//!
//! let (documents, identity) = gateways();
//! let stores = StoreSet::new(documents, identity, StoreConfig::default());
//! # let _ = stores;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod events;
mod feed;
mod music;
mod notifications;
mod optimistic;
mod settings;
mod snapshot;

pub use auth::AuthStore;
pub use events::EventsStore;
pub use feed::FeedStore;
pub use music::{MusicSnapshot, MusicStore};
pub use notifications::NotificationsStore;
pub use settings::{SettingsSnapshot, SettingsStore, UserSettings};
pub use snapshot::{Page, PageSnapshot};

use std::sync::Arc;
use vasilala_core::{DocumentGateway, IdentityGateway};

/// Store construction parameters
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Page size for cursor-paginated loads
    pub page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// The composition root: every domain store, constructed together
///
/// One `StoreSet` per signed-in client. Tests build fresh sets (or single
/// stores) per case for isolation.
pub struct StoreSet {
    /// Short-video feed
    pub feed: FeedStore,
    /// Tracks and playlists
    pub music: MusicStore,
    /// Events and ticketing
    pub events: EventsStore,
    /// Notifications
    pub notifications: NotificationsStore,
    /// User settings
    pub settings: SettingsStore,
    /// Session and permissions
    pub auth: AuthStore,
}

impl StoreSet {
    /// Construct all stores over shared gateway handles
    pub fn new(
        documents: Arc<dyn DocumentGateway>,
        identity: Arc<dyn IdentityGateway>,
        config: StoreConfig,
    ) -> Self {
        Self {
            feed: FeedStore::new(Arc::clone(&documents), config.page_size),
            music: MusicStore::new(Arc::clone(&documents), config.page_size),
            events: EventsStore::new(Arc::clone(&documents), config.page_size),
            notifications: NotificationsStore::new(Arc::clone(&documents), config.page_size),
            settings: SettingsStore::new(documents),
            auth: AuthStore::new(identity),
        }
    }
}
