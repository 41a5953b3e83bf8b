//! Short-video feed store
//!
//! Holds the in-memory snapshot of the video feed: cursor-paginated posts,
//! optimistic like/bookmark toggles, view counting, and client-side search.
//! All remote writes are fire-and-forget with rollback on failure.

use crate::optimistic::{spawn_write, toggle_counter};
use crate::snapshot::{Page, PageSnapshot};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;
use vasilala_core::gateway::collections;
use vasilala_core::{
    CoreError, Document, DocumentGateway, PostId, QueryFilter, Result, UserId, VideoPost,
};

/// Domain store for the video feed
pub struct FeedStore {
    gateway: Arc<dyn DocumentGateway>,
    state: Arc<RwLock<Page<VideoPost>>>,
    snapshot_tx: watch::Sender<PageSnapshot<VideoPost>>,
    page_size: usize,
}

impl FeedStore {
    /// Create a feed store over the given gateway
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
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<VideoPost>> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the first page, replacing the snapshot
    ///
    /// A call arriving while a load is in flight is a no-op; a failed fetch
    /// records an error and preserves the prior snapshot.
    pub async fn load(&self) {
        let Some(generation) = self.state.write().await.begin_load() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query(collections::POSTS, &QueryFilter::new(), self.page_size)
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

    /// Fetch the next page keyed by the last-seen post ID
    pub async fn load_more(&self) {
        let Some((generation, cursor)) = self.state.write().await.begin_load_more() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query_after(collections::POSTS, &QueryFilter::new(), &cursor, self.page_size)
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

    /// Drop all feed state (sign-out)
    ///
    /// Invalidates in-flight fetches so their results are discarded.
    pub async fn reset(&self) {
        self.state.write().await.reset();
        self.publish().await;
    }

    // === Getters (pure projections, no I/O) ===

    /// A post by ID
    pub async fn post(&self, id: &PostId) -> Option<VideoPost> {
        self.state
            .read()
            .await
            .items()
            .iter()
            .find(|post| &post.id == id)
            .cloned()
    }

    /// Posts by a given author, in feed order
    pub async fn posts_by_author(&self, author_id: &UserId) -> Vec<VideoPost> {
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|post| &post.author_id == author_id)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over captions and hashtags
    pub async fn search(&self, query: &str) -> Vec<VideoPost> {
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|post| post.matches(query))
            .cloned()
            .collect()
    }

    // === Optimistic mutations ===

    /// Toggle the like flag/counter pair on a post
    ///
    /// Applies locally first, then fires the remote write; rolled back if
    /// the write fails. Returns a handle on the in-flight write, or `None`
    /// when the post is not in the snapshot.
    pub async fn toggle_like(&self, post_id: &PostId) -> Option<JoinHandle<()>> {
        let now_liked = self
            .mutate_post(post_id, |post| {
                toggle_counter(&mut post.liked, &mut post.likes);
                post.liked
            })
            .await?;

        let gateway = Arc::clone(&self.gateway);
        let id = post_id.as_str().to_string();
        let delta = if now_liked { 1 } else { -1 };
        let remote = async move {
            gateway
                .increment(collections::POSTS, &id, "likes", delta)
                .await
        };

        let compensate = self.compensating_toggle(post_id.clone(), ToggleKind::Like);
        Some(spawn_write("feed.toggle_like", remote, compensate))
    }

    /// Toggle the bookmark flag on a post
    pub async fn toggle_bookmark(&self, post_id: &PostId) -> Option<JoinHandle<()>> {
        let now_bookmarked = self
            .mutate_post(post_id, |post| {
                post.bookmarked = !post.bookmarked;
                post.bookmarked
            })
            .await?;

        let gateway = Arc::clone(&self.gateway);
        let id = post_id.as_str().to_string();
        let patch = {
            let mut doc = Document::new();
            doc.set("bookmarked", serde_json::Value::Bool(now_bookmarked));
            doc
        };
        let remote = async move { gateway.update(collections::POSTS, &id, patch).await };

        let compensate = self.compensating_toggle(post_id.clone(), ToggleKind::Bookmark);
        Some(spawn_write("feed.toggle_bookmark", remote, compensate))
    }

    /// Count a view of a post
    pub async fn record_view(&self, post_id: &PostId) -> Option<JoinHandle<()>> {
        self.mutate_post(post_id, |post| post.views += 1).await?;

        let gateway = Arc::clone(&self.gateway);
        let id = post_id.as_str().to_string();
        let remote = async move { gateway.increment(collections::POSTS, &id, "views", 1).await };

        let compensate = self.compensating_toggle(post_id.clone(), ToggleKind::ViewUndo);
        Some(spawn_write("feed.record_view", remote, compensate))
    }

    /// Publish a new post after its media upload succeeded
    ///
    /// The caption is validated before any mutation or network call. The
    /// post appears in the snapshot immediately and is removed again if the
    /// remote create fails.
    pub async fn create_post(
        &self,
        author_id: UserId,
        media_url: impl Into<String>,
        caption: impl Into<String>,
    ) -> Result<(PostId, JoinHandle<()>)> {
        let caption = caption.into();
        if caption.trim().is_empty() {
            return Err(CoreError::validation("caption must not be empty"));
        }

        let post = VideoPost::new(author_id, media_url, caption);
        let post_id = post.id.clone();
        let document = Document::from_entity(&post)?;

        {
            let mut page = self.state.write().await;
            page.items_mut().insert(0, post);
        }
        self.publish().await;
        debug!(post_id = %post_id, "post added optimistically");

        let gateway = Arc::clone(&self.gateway);
        let remote = async move {
            gateway.create(collections::POSTS, document).await?;
            Ok(())
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = post_id.clone();
        let compensate = async move {
            let mut page = state.write().await;
            page.items_mut().retain(|post| post.id != rollback_id);
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        let handle = spawn_write("feed.create_post", remote, compensate);
        Ok((post_id, handle))
    }

    // === Internals ===

    /// Apply `mutate` to a post and republish; `None` if the post is absent
    async fn mutate_post<R>(
        &self,
        post_id: &PostId,
        mutate: impl FnOnce(&mut VideoPost) -> R,
    ) -> Option<R> {
        let result = {
            let mut page = self.state.write().await;
            let post = page.items_mut().iter_mut().find(|post| &post.id == post_id)?;
            mutate(post)
        };
        self.publish().await;
        Some(result)
    }

    /// Compensation undoing one optimistic change and republishing
    fn compensating_toggle(
        &self,
        post_id: PostId,
        kind: ToggleKind,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        async move {
            let mut page = state.write().await;
            if let Some(post) = page.items_mut().iter_mut().find(|post| post.id == post_id) {
                match kind {
                    ToggleKind::Like => toggle_counter(&mut post.liked, &mut post.likes),
                    ToggleKind::Bookmark => post.bookmarked = !post.bookmarked,
                    ToggleKind::ViewUndo => post.views = post.views.saturating_sub(1),
                }
            }
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        }
    }

    async fn publish(&self) {
        let snapshot = self.state.read().await.snapshot();
        self.snapshot_tx.send_replace(snapshot);
    }
}

/// Which optimistic change a compensation undoes
enum ToggleKind {
    Like,
    Bookmark,
    ViewUndo,
}
