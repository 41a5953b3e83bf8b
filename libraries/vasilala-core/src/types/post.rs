/// Video post domain types
use crate::types::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A short-video feed post
///
/// The interaction flags (`liked`, `bookmarked`) are client-local derived
/// state: they reflect the signed-in user's optimistic view and are not
/// guaranteed to match the gateway's true aggregates until the next fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPost {
    /// Unique post identifier
    pub id: PostId,

    /// Author user ID
    pub author_id: UserId,

    /// Streaming URL for the video media
    pub media_url: String,

    /// Thumbnail URL
    pub thumbnail_url: Option<String>,

    /// Caption text
    pub caption: String,

    /// Hashtags, stored lowercase without the leading `#`
    pub hashtags: BTreeSet<String>,

    /// Like counter
    pub likes: u64,

    /// Comment counter
    pub comments: u64,

    /// Share counter
    pub shares: u64,

    /// View counter
    pub views: u64,

    /// Whether the signed-in user has liked this post
    pub liked: bool,

    /// Whether the signed-in user has bookmarked this post
    pub bookmarked: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl VideoPost {
    /// Create a new post with zeroed counters
    pub fn new(author_id: UserId, media_url: impl Into<String>, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        let hashtags = extract_hashtags(&caption);

        Self {
            id: PostId::generate(),
            author_id,
            media_url: media_url.into(),
            thumbnail_url: None,
            caption,
            hashtags,
            likes: 0,
            comments: 0,
            shares: 0,
            views: 0,
            liked: false,
            bookmarked: false,
            created_at: Utc::now(),
        }
    }

    /// Whether the post matches a client-side substring query
    ///
    /// Case-insensitive over caption and hashtags.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim_start_matches('#').to_lowercase();
        if query.is_empty() {
            return false;
        }

        self.caption.to_lowercase().contains(&query)
            || self.hashtags.iter().any(|tag| tag.contains(&query))
    }
}

/// Pull `#tag` tokens out of a caption
pub fn extract_hashtags(caption: &str) -> BTreeSet<String> {
    caption
        .split_whitespace()
        .filter_map(|word| word.strip_prefix('#'))
        .map(|tag| tag.trim_end_matches(|c: char| !c.is_alphanumeric()))
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtags_extracted_from_caption() {
        let post = VideoPost::new(
            UserId::new("user-1"),
            "https://cdn.example/v.mp4",
            "Friday rehearsal #Bachata #dance!",
        );

        assert!(post.hashtags.contains("bachata"));
        assert!(post.hashtags.contains("dance"));
        assert_eq!(post.hashtags.len(), 2);
    }

    #[test]
    fn matches_caption_and_tags() {
        let post = VideoPost::new(
            UserId::new("user-1"),
            "https://cdn.example/v.mp4",
            "Sunset session #salsa",
        );

        assert!(post.matches("sunset"));
        assert!(post.matches("#SALSA"));
        assert!(post.matches("sal"));
        assert!(!post.matches("kizomba"));
        assert!(!post.matches(""));
    }
}
