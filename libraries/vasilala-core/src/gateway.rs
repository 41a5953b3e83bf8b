/// Gateway traits consumed by the domain stores
///
/// The hosted backend owns all durable state. These traits are the entire
/// surface the client uses: document CRUD with cursor pagination and atomic
/// field operations, binary object upload with progress, and identity.
/// `vasilala-gateway` provides the HTTP implementation; tests substitute
/// in-memory stubs.
use crate::document::Document;
use crate::error::Result;
use crate::types::AuthSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Collection names used by the stores
pub mod collections {
    /// Music tracks
    pub const TRACKS: &str = "tracks";
    /// Playlists
    pub const PLAYLISTS: &str = "playlists";
    /// Short-video posts
    pub const POSTS: &str = "posts";
    /// Event listings
    pub const EVENTS: &str = "events";
    /// Notifications
    pub const NOTIFICATIONS: &str = "notifications";
    /// User profiles and settings
    pub const USERS: &str = "users";
    /// Per-user settings documents
    pub const SETTINGS: &str = "settings";
}

/// A partial document applied as an update
pub type DocumentPatch = Document;

/// Fractional progress callback for uploads (0.0 to 1.0)
pub type ProgressFn = Arc<dyn Fn(f32) + Send + Sync>;

/// Callback invoked when the signed-in session changes
pub type SessionCallback = Box<dyn Fn(Option<AuthSession>) + Send + Sync>;

/// Equality-condition filter for document queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    conditions: Vec<(String, Value)>,
}

impl QueryFilter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Conditions in insertion order
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Document database operations
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Fetch a document by ID
    async fn get(&self, collection: &str, id: &str) -> Result<Document>;

    /// Query a collection, ordered by ID, first page
    async fn query(
        &self,
        collection: &str,
        filter: &QueryFilter,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Query the page following `after_id` (cursor pagination)
    async fn query_after(
        &self,
        collection: &str,
        filter: &QueryFilter,
        after_id: &str,
        limit: usize,
    ) -> Result<Vec<Document>>;

    /// Create a document, returning its ID
    async fn create(&self, collection: &str, document: Document) -> Result<String>;

    /// Apply a partial update to a document
    async fn update(&self, collection: &str, id: &str, patch: DocumentPatch) -> Result<()>;

    /// Delete a document
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Atomically add `delta` to a numeric field
    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64) -> Result<()>;

    /// Add a value to a set-like array field if absent
    async fn array_union(&self, collection: &str, id: &str, field: &str, value: Value)
        -> Result<()>;

    /// Remove a value from a set-like array field
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()>;
}

/// Binary object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under `key`, returning the public URL
    ///
    /// `on_progress` receives fractional progress in `[0.0, 1.0]` as the
    /// body streams.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        on_progress: Option<ProgressFn>,
    ) -> Result<String>;
}

/// Identity provider operations
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Register a new account and sign it in
    async fn sign_up(&self, email: &str, password: &str, display_name: &str)
        -> Result<AuthSession>;

    /// Sign in with credentials
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Sign out the current session
    async fn sign_out(&self) -> Result<()>;

    /// Register a callback fired on every session change (including sign-out)
    fn on_session_change(&self, callback: SessionCallback);
}
