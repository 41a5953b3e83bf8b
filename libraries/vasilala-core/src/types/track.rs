/// Track domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Moderation status of uploaded media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    /// Awaiting review
    Pending,
    /// Cleared for the public catalog
    Approved,
    /// Flagged by users or automated review
    Flagged,
    /// Removed from the catalog
    Removed,
}

impl ModerationStatus {
    /// Convert status to string for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Flagged => "flagged",
            ModerationStatus::Removed => "removed",
        }
    }

    /// Parse status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "flagged" => Some(ModerationStatus::Flagged),
            "removed" => Some(ModerationStatus::Removed),
            _ => None,
        }
    }
}

/// A streamable track
///
/// Client-side projection of a track document. Counters reflect the last
/// fetched values plus any optimistic local mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Track duration in seconds
    pub duration_secs: u32,

    /// Streaming URL for the audio media
    pub audio_url: String,

    /// Cover artwork URL (optional)
    pub cover_url: Option<String>,

    /// Play counter
    pub plays: u64,

    /// Like counter
    pub likes: u64,

    /// Share counter
    pub shares: u64,

    /// Whether the signed-in user has liked this track
    pub liked: bool,

    /// Whether the track is available offline on this device
    pub downloaded: bool,

    /// Whether the track belongs to one of the user's playlists
    pub in_playlist: bool,

    /// Moderation status
    pub moderation: ModerationStatus,
}

impl Track {
    /// Create a new track with zeroed counters and pending moderation
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration_secs,
            audio_url: audio_url.into(),
            cover_url: None,
            plays: 0,
            likes: 0,
            shares: 0,
            liked: false,
            downloaded: false,
            in_playlist: false,
            moderation: ModerationStatus::Pending,
        }
    }

    /// Whether the track may appear in public listings
    pub fn is_public(&self) -> bool {
        self.moderation == ModerationStatus::Approved
    }
}
