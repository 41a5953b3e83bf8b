//! Vasílala - Playback Session Management
//!
//! Platform-agnostic playback state management for the Vasílala client.
//!
//! This crate provides:
//! - A playback session state machine (idle, loading, playing, paused,
//!   ended) driving an abstract media element
//! - Cursor-based queue with repeat modes (Off, All, One)
//! - Permutation-based shuffle (no immediate repeats)
//! - Two named previous-track policies (queue pointer, history stack)
//! - Bounded playback history
//! - Volume with an independent mute flag
//! - Typed events for UI synchronization
//!
//! # Architecture
//!
//! `vasilala-playback` knows nothing about the platform: the native
//! audio/video element is supplied behind the [`MediaElement`] trait, and
//! the session learns about progress exclusively from [`MediaEvent`]s.
//! Position and duration are derived state, never assumed from a call
//! having been issued.
//!
//! # Example
//!
//! ```rust
//! use vasilala_playback::{
//!     MediaElement, PlaybackConfig, PlaybackSession, QueueItem, RepeatMode, Result,
//! };
//! use std::time::Duration;
//!
//! struct NullElement;
//!
//! impl MediaElement for NullElement {
//!     fn set_source(&mut self, _url: &str) {}
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn set_position(&mut self, _position: Duration) {}
//!     fn set_volume(&mut self, _gain: f32) {}
//! }
//!
//! let mut session = PlaybackSession::new(Box::new(NullElement), PlaybackConfig::default());
//! session.set_repeat(RepeatMode::All);
//!
//! let track = QueueItem {
//!     id: "track-1".to_string(),
//!     title: "Aurora".to_string(),
//!     artist: "Nova Pulse".to_string(),
//!     duration: Some(Duration::from_secs(215)),
//!     media_url: "https://cdn.example/aurora.mp3".to_string(),
//! };
//!
//! session.play(track, None);
//! ```

mod element;
mod error;
mod events;
mod history;
mod queue;
mod session;
mod shuffle;
mod volume;
pub mod types;

// Public exports
pub use element::{MediaElement, MediaEvent};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use queue::Queue;
pub use session::PlaybackSession;
pub use shuffle::draw_permutation;
pub use types::{PlaybackConfig, PreviousPolicy, QueueItem, RepeatMode, SessionState};
pub use volume::Volume;
