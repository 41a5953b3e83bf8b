//! Domain types for the Vasílala client
//!
//! Every type here is a client-side projection of a remote document (or, for
//! sessions, pure client state). Stores are the sole owners of these
//! projections at runtime.

mod event;
mod ids;
mod notification;
mod playlist;
mod post;
mod track;
mod user;

pub use event::{Event, TicketTier, Venue};
pub use ids::{EventId, NotificationId, PlaylistId, PostId, TrackId, UserId};
pub use notification::{Notification, NotificationKind, RETENTION_DAYS};
pub use playlist::Playlist;
pub use post::{extract_hashtags, VideoPost};
pub use track::{ModerationStatus, Track};
pub use user::{AuthSession, UserProfile, UserRole, VerificationStatus};
