/// Notification domain types
use crate::types::NotificationId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days a notification is retained before the local sweep drops it
pub const RETENTION_DAYS: i64 = 30;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Someone liked your content
    Like,
    /// Someone commented on your content
    Comment,
    /// Someone followed you
    Follow,
    /// An event you follow changed
    Event,
    /// Informational message
    Info,
    /// Success confirmation
    Success,
    /// Warning
    Warning,
    /// Error report
    Error,
}

impl NotificationKind {
    /// Convert kind to string for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
            NotificationKind::Event => "event",
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }

    /// Parse kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(NotificationKind::Like),
            "comment" => Some(NotificationKind::Comment),
            "follow" => Some(NotificationKind::Follow),
            "event" => Some(NotificationKind::Event),
            "info" => Some(NotificationKind::Info),
            "success" => Some(NotificationKind::Success),
            "warning" => Some(NotificationKind::Warning),
            "error" => Some(NotificationKind::Error),
            _ => None,
        }
    }
}

/// A notification shown to the user
///
/// Created locally by the notification store's helpers or ingested from the
/// gateway. Expiry is evaluated locally against `created_at`; there is no
/// durable TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: NotificationId,

    /// Category
    pub kind: NotificationKind,

    /// Display message
    pub message: String,

    /// Whether the user has seen it
    pub read: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Optional navigation target
    pub action_link: Option<String>,
}

impl Notification {
    /// Create a new unread notification stamped now
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::generate(),
            kind,
            message: message.into(),
            read: false,
            created_at: Utc::now(),
            action_link: None,
        }
    }

    /// Attach a navigation target
    pub fn with_action_link(mut self, link: impl Into<String>) -> Self {
        self.action_link = Some(link.into());
        self
    }

    /// Whether the retention window has elapsed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::days(RETENTION_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_notification_not_expired() {
        let n = Notification::new(NotificationKind::Like, "Ana liked your video");
        assert!(!n.is_expired(Utc::now()));
        assert!(!n.read);
    }

    #[test]
    fn expires_after_retention_window() {
        let mut n = Notification::new(NotificationKind::Info, "Welcome!");
        n.created_at = Utc::now() - Duration::days(RETENTION_DAYS + 1);
        assert!(n.is_expired(Utc::now()));
    }

    #[test]
    fn kind_string_conversion() {
        assert_eq!(NotificationKind::Comment.as_str(), "comment");
        assert_eq!(
            NotificationKind::parse("warning"),
            Some(NotificationKind::Warning)
        );
        assert_eq!(NotificationKind::parse("nope"), None);
    }
}
