/// User and session domain types
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user registered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular listener/viewer
    Fan,
    /// Music artist
    Artist,
    /// DJ
    Dj,
    /// Dancer
    Dancer,
    /// Dance school
    School,
    /// Venue
    Venue,
    /// Event organizer
    Organizer,
}

impl UserRole {
    /// Convert role to string for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Fan => "fan",
            UserRole::Artist => "artist",
            UserRole::Dj => "dj",
            UserRole::Dancer => "dancer",
            UserRole::School => "school",
            UserRole::Venue => "venue",
            UserRole::Organizer => "organizer",
        }
    }

    /// Parse role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fan" => Some(UserRole::Fan),
            "artist" => Some(UserRole::Artist),
            "dj" => Some(UserRole::Dj),
            "dancer" => Some(UserRole::Dancer),
            "school" => Some(UserRole::School),
            "venue" => Some(UserRole::Venue),
            "organizer" => Some(UserRole::Organizer),
            _ => None,
        }
    }
}

/// Outcome of the verification workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Submitted, not yet reviewed
    Pending,
    /// Verified
    Approved,
    /// Rejected
    Rejected,
}

impl VerificationStatus {
    /// Convert status to string for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    /// Parse status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VerificationStatus::Pending),
            "approved" => Some(VerificationStatus::Approved),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

/// A user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub display_name: String,

    /// Registered role
    pub role: UserRole,

    /// Verification workflow status
    pub verification: VerificationStatus,
}

impl UserProfile {
    /// Create a new unverified fan profile
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: UserRole::Fan,
            verification: VerificationStatus::Pending,
        }
    }

    /// Whether the profile passed verification
    pub fn is_verified(&self) -> bool {
        self.verification == VerificationStatus::Approved
    }

    /// Whether the user may publish tracks to the music catalog
    pub fn can_publish_tracks(&self) -> bool {
        self.is_verified() && matches!(self.role, UserRole::Artist | UserRole::Dj)
    }

    /// Whether the user may create event listings
    pub fn can_publish_events(&self) -> bool {
        self.is_verified()
            && matches!(
                self.role,
                UserRole::Organizer | UserRole::Venue | UserRole::School
            )
    }

    /// Whether the user may upload feed videos
    ///
    /// Any signed-in account can post to the feed; verification is not
    /// required for short videos.
    pub fn can_upload_videos(&self) -> bool {
        true
    }
}

/// A signed-in session
///
/// Pure client state mirroring the identity provider; rebuilt from the
/// session-change notification on every start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Signed-in user ID
    pub user_id: UserId,

    /// Profile of the signed-in user
    pub profile: UserProfile,

    /// When the session was established
    pub signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a session for a profile, stamped now
    pub fn new(profile: UserProfile) -> Self {
        Self {
            user_id: profile.id.clone(),
            profile,
            signed_in_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: UserRole, verification: VerificationStatus) -> UserProfile {
        UserProfile {
            id: UserId::new("user-1"),
            display_name: "Ana".to_string(),
            role,
            verification,
        }
    }

    #[test]
    fn verified_artist_can_publish_tracks() {
        let p = profile(UserRole::Artist, VerificationStatus::Approved);
        assert!(p.can_publish_tracks());
        assert!(!p.can_publish_events());
    }

    #[test]
    fn unverified_artist_cannot_publish() {
        let p = profile(UserRole::Artist, VerificationStatus::Pending);
        assert!(!p.can_publish_tracks());
    }

    #[test]
    fn verified_organizer_can_publish_events() {
        let p = profile(UserRole::Organizer, VerificationStatus::Approved);
        assert!(p.can_publish_events());
        assert!(!p.can_publish_tracks());
    }

    #[test]
    fn anyone_can_upload_videos() {
        let p = profile(UserRole::Fan, VerificationStatus::Rejected);
        assert!(p.can_upload_videos());
    }

    #[test]
    fn role_string_conversion() {
        assert_eq!(UserRole::Dj.as_str(), "dj");
        assert_eq!(UserRole::parse("dancer"), Some(UserRole::Dancer));
        assert_eq!(UserRole::parse("robot"), None);
    }
}
