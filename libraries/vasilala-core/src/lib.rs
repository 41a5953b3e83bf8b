//! Vasílala Client Core
//!
//! Platform-agnostic domain types, gateway traits, and error handling for the
//! Vasílala client.
//!
//! The client owns no durable storage: every entity defined here is a cached,
//! possibly-stale read replica of a document held by the hosted backend. This
//! crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `VideoPost`, `Event`,
//!   `Notification`, `UserProfile`, etc.
//! - **Gateway Traits**: `DocumentGateway`, `ObjectStore`, `IdentityGateway`
//! - **Document Decoding**: typed decoders over the untyped document store
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vasilala_core::types::{Playlist, Track, UserId};
//!
//! let owner = UserId::generate();
//! let mut playlist = Playlist::new(owner, "Late Night Sets");
//!
//! let track = Track::new("Aurora", "Nova Pulse", 215, "https://cdn.example/aurora.mp3");
//! playlist.add_track(&track).unwrap();
//!
//! assert_eq!(playlist.track_count, 1);
//! assert_eq!(playlist.total_duration_secs, 215);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod gateway;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use document::{Document, FromDocument};
pub use error::{CoreError, Result};
pub use gateway::{
    DocumentGateway, DocumentPatch, IdentityGateway, ObjectStore, ProgressFn, QueryFilter,
    SessionCallback,
};
pub use validate::{UploadKind, UploadLimits};

pub use types::{
    AuthSession, Event, EventId, ModerationStatus, Notification, NotificationId, NotificationKind,
    Playlist, PlaylistId, PostId, TicketTier, Track, TrackId, UserId, UserProfile, UserRole,
    Venue, VerificationStatus, VideoPost,
};
