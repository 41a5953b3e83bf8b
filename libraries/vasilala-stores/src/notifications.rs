//! Notifications store
//!
//! Notifications arrive two ways: pushed from the gateway (likes, comments,
//! follows, event changes) and created locally by the helper constructors
//! (info/success/warning/error toasts that also persist). Expiry is a local
//! sweep over the fixed retention window, not a durable TTL.

use crate::optimistic::spawn_write;
use crate::snapshot::{Page, PageSnapshot};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;
use vasilala_core::gateway::collections;
use vasilala_core::{
    Document, DocumentGateway, Notification, NotificationId, NotificationKind, QueryFilter,
    Result, UserId,
};

/// Domain store for notifications
pub struct NotificationsStore {
    gateway: Arc<dyn DocumentGateway>,
    state: Arc<RwLock<Page<Notification>>>,
    snapshot_tx: watch::Sender<PageSnapshot<Notification>>,
    page_size: usize,
}

impl NotificationsStore {
    /// Create a notifications store over the given gateway
    pub fn new(gateway: Arc<dyn DocumentGateway>, page_size: usize) -> Self {
        let (snapshot_tx, _) = watch::channel(PageSnapshot::default());
        Self {
            gateway,
            state: Arc::new(RwLock::new(Page::default())),
            snapshot_tx,
            page_size,
        }
    }

    /// Read-only snapshot subscription for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<Notification>> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the first page of the user's notifications
    pub async fn load(&self, user_id: &UserId) {
        let Some(generation) = self.state.write().await.begin_load() else {
            return;
        };
        self.publish().await;

        let filter = QueryFilter::new().eq("user_id", user_id.as_str());
        let result = self
            .gateway
            .query(collections::NOTIFICATIONS, &filter, self.page_size)
            .await;

        let changed = self
            .state
            .write()
            .await
            .apply_load_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Fetch the next page keyed by the last-seen notification ID
    pub async fn load_more(&self, user_id: &UserId) {
        let Some((generation, cursor)) = self.state.write().await.begin_load_more() else {
            return;
        };
        self.publish().await;

        let filter = QueryFilter::new().eq("user_id", user_id.as_str());
        let result = self
            .gateway
            .query_after(collections::NOTIFICATIONS, &filter, &cursor, self.page_size)
            .await;

        let changed = self
            .state
            .write()
            .await
            .apply_load_more_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Ingest a notification pushed by the gateway
    pub async fn ingest(&self, notification: Notification) {
        {
            let mut page = self.state.write().await;
            page.items_mut().insert(0, notification);
        }
        self.publish().await;
    }

    // === Local creation helpers ===

    /// Create a notification locally and persist it for `user_id`
    ///
    /// The notification is visible immediately; if the remote create fails
    /// it is removed again.
    pub async fn notify(
        &self,
        user_id: &UserId,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        let notification = Notification::new(kind, message);
        let id = notification.id.clone();

        let mut document = Document::from_entity(&notification)?;
        document.set("user_id", user_id.as_str().into());

        {
            let mut page = self.state.write().await;
            page.items_mut().insert(0, notification);
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let remote = async move {
            gateway.create(collections::NOTIFICATIONS, document).await?;
            Ok(())
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = id;
        let compensate = async move {
            let mut page = state.write().await;
            page.items_mut().retain(|n| n.id != rollback_id);
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        Ok(spawn_write("notifications.notify", remote, compensate))
    }

    /// Informational notification
    pub async fn notify_info(
        &self,
        user_id: &UserId,
        message: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        self.notify(user_id, NotificationKind::Info, message).await
    }

    /// Success notification
    pub async fn notify_success(
        &self,
        user_id: &UserId,
        message: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        self.notify(user_id, NotificationKind::Success, message).await
    }

    /// Warning notification
    pub async fn notify_warning(
        &self,
        user_id: &UserId,
        message: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        self.notify(user_id, NotificationKind::Warning, message).await
    }

    /// Error notification
    pub async fn notify_error(
        &self,
        user_id: &UserId,
        message: impl Into<String>,
    ) -> Result<JoinHandle<()>> {
        self.notify(user_id, NotificationKind::Error, message).await
    }

    // === Mutations ===

    /// Mark one notification read
    pub async fn mark_read(&self, id: &NotificationId) -> Option<JoinHandle<()>> {
        let was_read = {
            let mut page = self.state.write().await;
            let notification = page.items_mut().iter_mut().find(|n| &n.id == id)?;
            let was_read = notification.read;
            notification.read = true;
            was_read
        };
        if was_read {
            // Already read; nothing to write
            return None;
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let key = id.as_str().to_string();
        let remote = async move {
            let mut patch = Document::new();
            patch.set("read", true.into());
            gateway.update(collections::NOTIFICATIONS, &key, patch).await
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = id.clone();
        let compensate = async move {
            let mut page = state.write().await;
            if let Some(notification) = page.items_mut().iter_mut().find(|n| n.id == rollback_id) {
                notification.read = false;
            }
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        Some(spawn_write("notifications.mark_read", remote, compensate))
    }

    /// Mark every notification read
    pub async fn mark_all_read(&self) -> Vec<JoinHandle<()>> {
        let unread: Vec<NotificationId> = self
            .state
            .read()
            .await
            .items()
            .iter()
            .filter(|n| !n.read)
            .map(|n| n.id.clone())
            .collect();

        let mut handles = Vec::with_capacity(unread.len());
        for id in unread {
            if let Some(handle) = self.mark_read(&id).await {
                handles.push(handle);
            }
        }
        handles
    }

    /// Run the retention sweep on a timer until the returned handle is
    /// aborted
    pub fn spawn_retention_sweep(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                self.prune_expired().await;
            }
        })
    }

    /// Drop notifications older than the retention window
    ///
    /// Local-only: the sweep does not delete remote documents, it just
    /// stops showing them.
    pub async fn prune_expired(&self) {
        let now = Utc::now();
        let removed = {
            let mut page = self.state.write().await;
            let before = page.items().len();
            page.items_mut().retain(|n| !n.is_expired(now));
            before - page.items().len()
        };
        if removed > 0 {
            debug!(removed, "pruned expired notifications");
            self.publish().await;
        }
    }

    /// Drop all notification state (sign-out)
    pub async fn reset(&self) {
        self.state.write().await.reset();
        self.publish().await;
    }

    // === Getters (pure projections, no I/O) ===

    /// Number of unread notifications
    pub async fn unread_count(&self) -> usize {
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    async fn publish(&self) {
        let snapshot = self.state.read().await.snapshot();
        self.snapshot_tx.send_replace(snapshot);
    }
}
