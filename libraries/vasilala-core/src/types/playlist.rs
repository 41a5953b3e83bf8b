/// Playlist domain types
use crate::error::{CoreError, Result};
use crate::types::{PlaylistId, Track, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist
///
/// Track order is meaningful: it is the playback sequence. The aggregates
/// `track_count` and `total_duration_secs` are maintained incrementally by
/// the mutation methods and must stay consistent with `tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID
    pub owner_id: UserId,

    /// Playlist name
    pub name: String,

    /// Ordered track IDs (playback sequence)
    pub tracks: Vec<TrackId>,

    /// Number of tracks; always equals `tracks.len()`
    pub track_count: u32,

    /// Sum of member track durations in seconds
    pub total_duration_secs: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::generate(),
            owner_id,
            name: name.into(),
            tracks: Vec::new(),
            track_count: 0,
            total_duration_secs: 0,
            created_at: Utc::now(),
        }
    }

    /// Append a track, updating the aggregates
    ///
    /// Duplicate adds are rejected so the duration aggregate cannot drift.
    pub fn add_track(&mut self, track: &Track) -> Result<()> {
        if self.tracks.contains(&track.id) {
            return Err(CoreError::invalid_input(format!(
                "track {} already in playlist",
                track.id
            )));
        }

        self.tracks.push(track.id.clone());
        self.track_count += 1;
        self.total_duration_secs += u64::from(track.duration_secs);
        Ok(())
    }

    /// Remove a track, updating the aggregates
    ///
    /// Removing a track that is not a member is a no-op.
    pub fn remove_track(&mut self, track_id: &TrackId, duration_secs: u32) {
        let Some(position) = self.tracks.iter().position(|id| id == track_id) else {
            return;
        };

        self.tracks.remove(position);
        self.track_count = self.track_count.saturating_sub(1);
        self.total_duration_secs = self
            .total_duration_secs
            .saturating_sub(u64::from(duration_secs));
    }

    /// Move a track from one position to another
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.tracks.len() || to >= self.tracks.len() {
            return Err(CoreError::invalid_input("reorder index out of bounds"));
        }
        if from == to {
            return Ok(());
        }

        let id = self.tracks.remove(from);
        self.tracks.insert(to, id);
        Ok(())
    }

    /// Whether the playlist contains the given track
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.tracks.contains(track_id)
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
