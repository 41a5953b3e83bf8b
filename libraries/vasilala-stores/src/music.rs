//! Music store
//!
//! Holds the track catalog page and the user's playlists. Playlist
//! mutations keep the count/duration aggregates consistent with the track
//! list on every operation; remote writes mirror them with array
//! union/remove plus atomic increments, rolling the local change back on
//! failure.

use crate::optimistic::{spawn_write, toggle_counter};
use crate::snapshot::{Page, PageSnapshot};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use vasilala_core::gateway::collections;
use vasilala_core::{
    CoreError, Document, DocumentGateway, Playlist, PlaylistId, QueryFilter, Result, Track,
    TrackId, UserId,
};
use vasilala_playback::QueueItem;

/// Playlists are fetched wholesale rather than paginated
const PLAYLIST_FETCH_LIMIT: usize = 200;

#[derive(Default)]
struct MusicState {
    tracks: Page<Track>,
    playlists: Page<Playlist>,
}

/// Immutable view of the music domain
#[derive(Debug, Clone, Default, Serialize)]
pub struct MusicSnapshot {
    /// Track catalog page
    pub tracks: PageSnapshot<Track>,
    /// The user's playlists
    pub playlists: PageSnapshot<Playlist>,
}

/// Domain store for tracks and playlists
pub struct MusicStore {
    gateway: Arc<dyn DocumentGateway>,
    state: Arc<RwLock<MusicState>>,
    snapshot_tx: watch::Sender<MusicSnapshot>,
    page_size: usize,
}

impl MusicStore {
    /// Create a music store over the given gateway
    pub fn new(gateway: Arc<dyn DocumentGateway>, page_size: usize) -> Self {
        let (snapshot_tx, _) = watch::channel(MusicSnapshot::default());
        Self {
            gateway,
            state: Arc::new(RwLock::new(MusicState::default())),
            snapshot_tx,
            page_size,
        }
    }

    /// Read-only snapshot subscription for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<MusicSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the first page of the track catalog
    pub async fn load_tracks(&self) {
        let Some(generation) = self.state.write().await.tracks.begin_load() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query(collections::TRACKS, &QueryFilter::new(), self.page_size)
            .await;

        let changed = self
            .state
            .write()
            .await
            .tracks
            .apply_load_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Fetch the next catalog page keyed by the last-seen track ID
    pub async fn load_more_tracks(&self) {
        let Some((generation, cursor)) = self.state.write().await.tracks.begin_load_more() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query_after(
                collections::TRACKS,
                &QueryFilter::new(),
                &cursor,
                self.page_size,
            )
            .await;

        let changed = self
            .state
            .write()
            .await
            .tracks
            .apply_load_more_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Fetch all playlists owned by `owner_id`
    pub async fn load_playlists(&self, owner_id: &UserId) {
        let Some(generation) = self.state.write().await.playlists.begin_load() else {
            return;
        };
        self.publish().await;

        let filter = QueryFilter::new().eq("owner_id", owner_id.as_str());
        let result = self
            .gateway
            .query(collections::PLAYLISTS, &filter, PLAYLIST_FETCH_LIMIT)
            .await;

        let changed = self
            .state
            .write()
            .await
            .playlists
            .apply_load_result(generation, result, PLAYLIST_FETCH_LIMIT);
        if changed {
            self.publish().await;
        }
    }

    /// Drop all music state (sign-out)
    pub async fn reset(&self) {
        {
            let mut state = self.state.write().await;
            state.tracks.reset();
            state.playlists.reset();
        }
        self.publish().await;
    }

    // === Getters (pure projections, no I/O) ===

    /// A track by ID
    pub async fn track(&self, id: &TrackId) -> Option<Track> {
        self.state
            .read()
            .await
            .tracks
            .items()
            .iter()
            .find(|track| &track.id == id)
            .cloned()
    }

    /// A playlist by ID
    pub async fn playlist(&self, id: &PlaylistId) -> Option<Playlist> {
        self.state
            .read()
            .await
            .playlists
            .items()
            .iter()
            .find(|playlist| &playlist.id == id)
            .cloned()
    }

    /// Case-insensitive substring search over title, artist, and album
    pub async fn search(&self, query: &str) -> Vec<Track> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.state
            .read()
            .await
            .tracks
            .items()
            .iter()
            .filter(|track| {
                track.title.to_lowercase().contains(&query)
                    || track.artist.to_lowercase().contains(&query)
                    || track
                        .album
                        .as_ref()
                        .is_some_and(|album| album.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }

    /// Project a playlist into playback queue items, in playlist order
    ///
    /// Tracks missing from the catalog snapshot are skipped.
    pub async fn queue_items(&self, playlist_id: &PlaylistId) -> Vec<QueueItem> {
        let state = self.state.read().await;
        let Some(playlist) = state
            .playlists
            .items()
            .iter()
            .find(|playlist| &playlist.id == playlist_id)
        else {
            return Vec::new();
        };

        playlist
            .tracks
            .iter()
            .filter_map(|track_id| {
                state
                    .tracks
                    .items()
                    .iter()
                    .find(|track| &track.id == track_id)
            })
            .map(|track| QueueItem {
                id: track.id.as_str().to_string(),
                title: track.title.clone(),
                artist: track.artist.clone(),
                duration: Some(Duration::from_secs(u64::from(track.duration_secs))),
                media_url: track.audio_url.clone(),
            })
            .collect()
    }

    // === Optimistic mutations ===

    /// Toggle the like flag/counter pair on a track
    pub async fn toggle_like(&self, track_id: &TrackId) -> Option<JoinHandle<()>> {
        let now_liked = {
            let mut state = self.state.write().await;
            let track = state
                .tracks
                .items_mut()
                .iter_mut()
                .find(|track| &track.id == track_id)?;
            toggle_counter(&mut track.liked, &mut track.likes);
            track.liked
        };
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let id = track_id.as_str().to_string();
        let delta = if now_liked { 1 } else { -1 };
        let remote = async move {
            gateway
                .increment(collections::TRACKS, &id, "likes", delta)
                .await
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = track_id.clone();
        let compensate = async move {
            let mut state = state.write().await;
            if let Some(track) = state
                .tracks
                .items_mut()
                .iter_mut()
                .find(|track| track.id == rollback_id)
            {
                toggle_counter(&mut track.liked, &mut track.likes);
            }
            publish_locked(&mut state, &snapshot_tx);
        };

        Some(spawn_write("music.toggle_like", remote, compensate))
    }

    /// Count a playback start on a track
    pub async fn register_play(&self, track_id: &TrackId) -> Option<JoinHandle<()>> {
        {
            let mut state = self.state.write().await;
            let track = state
                .tracks
                .items_mut()
                .iter_mut()
                .find(|track| &track.id == track_id)?;
            track.plays += 1;
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let id = track_id.as_str().to_string();
        let remote = async move { gateway.increment(collections::TRACKS, &id, "plays", 1).await };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = track_id.clone();
        let compensate = async move {
            let mut state = state.write().await;
            if let Some(track) = state
                .tracks
                .items_mut()
                .iter_mut()
                .find(|track| track.id == rollback_id)
            {
                track.plays = track.plays.saturating_sub(1);
            }
            publish_locked(&mut state, &snapshot_tx);
        };

        Some(spawn_write("music.register_play", remote, compensate))
    }

    /// Create a playlist
    pub async fn create_playlist(
        &self,
        owner_id: UserId,
        name: impl Into<String>,
    ) -> Result<(PlaylistId, JoinHandle<()>)> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::validation("playlist name must not be empty"));
        }

        let playlist = Playlist::new(owner_id, name);
        let playlist_id = playlist.id.clone();
        let document = Document::from_entity(&playlist)?;

        {
            let mut state = self.state.write().await;
            state.playlists.items_mut().push(playlist);
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let remote = async move {
            gateway.create(collections::PLAYLISTS, document).await?;
            Ok(())
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = playlist_id.clone();
        let compensate = async move {
            let mut state = state.write().await;
            state
                .playlists
                .items_mut()
                .retain(|playlist| playlist.id != rollback_id);
            publish_locked(&mut state, &snapshot_tx);
        };

        let handle = spawn_write("music.create_playlist", remote, compensate);
        Ok((playlist_id, handle))
    }

    /// Add a track to a playlist, maintaining the aggregates
    ///
    /// Rejected synchronously when the track is absent from the catalog
    /// snapshot, the playlist is unknown, or the track is already a member.
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<JoinHandle<()>> {
        let track = self
            .track(track_id)
            .await
            .ok_or_else(|| CoreError::not_found("track", track_id.as_str()))?;

        {
            let mut state = self.state.write().await;
            let playlist = state
                .playlists
                .items_mut()
                .iter_mut()
                .find(|playlist| &playlist.id == playlist_id)
                .ok_or_else(|| CoreError::not_found("playlist", playlist_id.as_str()))?;
            playlist.add_track(&track)?;

            if let Some(track) = state
                .tracks
                .items_mut()
                .iter_mut()
                .find(|entry| &entry.id == track_id)
            {
                track.in_playlist = true;
            }
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let playlist_key = playlist_id.as_str().to_string();
        let track_key = track_id.as_str().to_string();
        let duration = i64::from(track.duration_secs);
        let remote = async move {
            gateway
                .array_union(
                    collections::PLAYLISTS,
                    &playlist_key,
                    "tracks",
                    json!(track_key),
                )
                .await?;
            gateway
                .increment(collections::PLAYLISTS, &playlist_key, "track_count", 1)
                .await?;
            gateway
                .increment(
                    collections::PLAYLISTS,
                    &playlist_key,
                    "total_duration_secs",
                    duration,
                )
                .await
        };

        let compensate =
            self.compensating_removal(playlist_id.clone(), track_id.clone(), track.duration_secs);
        Ok(spawn_write("music.add_track_to_playlist", remote, compensate))
    }

    /// Remove a track from a playlist, maintaining the aggregates
    ///
    /// Requires the track in the catalog snapshot so the duration aggregate
    /// can be decremented accurately.
    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<JoinHandle<()>> {
        let track = self
            .track(track_id)
            .await
            .ok_or_else(|| CoreError::not_found("track", track_id.as_str()))?;

        {
            let mut state = self.state.write().await;
            let playlist = state
                .playlists
                .items_mut()
                .iter_mut()
                .find(|playlist| &playlist.id == playlist_id)
                .ok_or_else(|| CoreError::not_found("playlist", playlist_id.as_str()))?;
            playlist.remove_track(track_id, track.duration_secs);
            refresh_membership_flag(&mut state, track_id);
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let playlist_key = playlist_id.as_str().to_string();
        let track_key = track_id.as_str().to_string();
        let duration = i64::from(track.duration_secs);
        let remote = async move {
            gateway
                .array_remove(
                    collections::PLAYLISTS,
                    &playlist_key,
                    "tracks",
                    json!(track_key),
                )
                .await?;
            gateway
                .increment(collections::PLAYLISTS, &playlist_key, "track_count", -1)
                .await?;
            gateway
                .increment(
                    collections::PLAYLISTS,
                    &playlist_key,
                    "total_duration_secs",
                    -duration,
                )
                .await
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_playlist = playlist_id.clone();
        let rollback_track = track.clone();
        let compensate = async move {
            let mut state = state.write().await;
            if let Some(playlist) = state
                .playlists
                .items_mut()
                .iter_mut()
                .find(|playlist| playlist.id == rollback_playlist)
            {
                // Best effort: a duplicate re-add is rejected by the entity
                let _ = playlist.add_track(&rollback_track);
            }
            refresh_membership_flag(&mut state, &rollback_track.id);
            publish_locked(&mut state, &snapshot_tx);
        };

        Ok(spawn_write(
            "music.remove_track_from_playlist",
            remote,
            compensate,
        ))
    }

    // === Internals ===

    fn compensating_removal(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
        duration_secs: u32,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        async move {
            let mut state = state.write().await;
            if let Some(playlist) = state
                .playlists
                .items_mut()
                .iter_mut()
                .find(|playlist| playlist.id == playlist_id)
            {
                playlist.remove_track(&track_id, duration_secs);
            }
            refresh_membership_flag(&mut state, &track_id);
            publish_locked(&mut state, &snapshot_tx);
        }
    }

    async fn publish(&self) {
        let state = self.state.read().await;
        let snapshot = MusicSnapshot {
            tracks: state.tracks.snapshot(),
            playlists: state.playlists.snapshot(),
        };
        drop(state);
        self.snapshot_tx.send_replace(snapshot);
    }
}

/// Recompute a track's `in_playlist` flag from actual membership
fn refresh_membership_flag(state: &mut MusicState, track_id: &TrackId) {
    let member = state
        .playlists
        .items()
        .iter()
        .any(|playlist| playlist.contains(track_id));
    if let Some(track) = state
        .tracks
        .items_mut()
        .iter_mut()
        .find(|track| &track.id == track_id)
    {
        track.in_playlist = member;
    }
}

/// Publish while already holding the write lock
fn publish_locked(state: &mut MusicState, snapshot_tx: &watch::Sender<MusicSnapshot>) {
    let snapshot = MusicSnapshot {
        tracks: state.tracks.snapshot(),
        playlists: state.playlists.snapshot(),
    };
    snapshot_tx.send_replace(snapshot);
}
