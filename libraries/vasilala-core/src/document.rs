//! Untyped documents and typed decoders
//!
//! The hosted document store returns schemaless JSON objects. Nothing outside
//! this module converts raw documents into domain types: each entity has an
//! explicit decoder that rejects malformed documents instead of letting
//! missing fields leak into the snapshot. Unknown extra fields are ignored;
//! counters are clamped at zero.

use crate::error::{CoreError, Result};
use crate::types::{
    Event, EventId, ModerationStatus, Notification, NotificationId, NotificationKind, Playlist,
    PlaylistId, PostId, TicketTier, Track, TrackId, UserId, UserProfile, UserRole, Venue,
    VerificationStatus, VideoPost,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// An untyped document as stored by the gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; rejects anything that is not an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::invalid_input(format!(
                "expected a document object, got {other}"
            ))),
        }
    }

    /// Serialize an entity into a document
    pub fn from_entity<T: Serialize>(entity: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(entity)?)
    }

    /// Consume into the underlying JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    // === Typed accessors ===
    //
    // Errors carry only the reason; decoders attach the collection name.

    /// Required string field
    pub fn str_field(&self, field: &str) -> std::result::Result<&str, String> {
        match self.0.get(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(format!("field '{field}' is not a string: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }

    /// Optional string field; null and absent both decode to `None`
    pub fn opt_str_field(&self, field: &str) -> std::result::Result<Option<String>, String> {
        match self.0.get(field) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(format!("field '{field}' is not a string: {other}")),
        }
    }

    /// Required counter field; negative wire values clamp to zero
    pub fn counter_field(&self, field: &str) -> std::result::Result<u64, String> {
        match self.0.get(field) {
            Some(Value::Number(n)) => Ok(n.as_u64().unwrap_or(0)),
            Some(other) => Err(format!("field '{field}' is not a number: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }

    /// Required u32 field (durations, quantities); negatives clamp to zero
    pub fn u32_field(&self, field: &str) -> std::result::Result<u32, String> {
        let value = self.counter_field(field)?;
        u32::try_from(value).map_err(|_| format!("field '{field}' out of range: {value}"))
    }

    /// Required float field
    pub fn float_field(&self, field: &str) -> std::result::Result<f64, String> {
        match self.0.get(field) {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| format!("field '{field}' is not a float")),
            Some(other) => Err(format!("field '{field}' is not a number: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }

    /// Boolean flag; absent decodes to `default` (flags are client-local)
    pub fn flag_field(&self, field: &str, default: bool) -> std::result::Result<bool, String> {
        match self.0.get(field) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Null) | None => Ok(default),
            Some(other) => Err(format!("field '{field}' is not a boolean: {other}")),
        }
    }

    /// Required RFC 3339 timestamp field
    pub fn timestamp_field(&self, field: &str) -> std::result::Result<DateTime<Utc>, String> {
        let raw = self.str_field(field)?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("field '{field}' is not a timestamp: {e}"))
    }

    /// Required array of strings
    pub fn str_list_field(&self, field: &str) -> std::result::Result<Vec<String>, String> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(format!("field '{field}' contains a non-string: {other}")),
                })
                .collect(),
            Some(other) => Err(format!("field '{field}' is not an array: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }

    /// Required array of nested documents
    pub fn doc_list_field(&self, field: &str) -> std::result::Result<Vec<Document>, String> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(Document(map.clone())),
                    other => Err(format!("field '{field}' contains a non-object: {other}")),
                })
                .collect(),
            Some(other) => Err(format!("field '{field}' is not an array: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }

    /// Required nested document
    pub fn doc_field(&self, field: &str) -> std::result::Result<Document, String> {
        match self.0.get(field) {
            Some(Value::Object(map)) => Ok(Document(map.clone())),
            Some(other) => Err(format!("field '{field}' is not an object: {other}")),
            None => Err(format!("missing field '{field}'")),
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decoder from an untyped document into a typed entity
pub trait FromDocument: Sized {
    /// Collection this entity lives in; used in decode errors
    const COLLECTION: &'static str;

    /// Decode, rejecting documents with missing or mistyped required fields
    fn from_document(doc: &Document) -> Result<Self>;
}

fn decode_err(collection: &'static str) -> impl Fn(String) -> CoreError {
    move |reason| CoreError::decode(collection, reason)
}

impl FromDocument for Track {
    const COLLECTION: &'static str = "tracks";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);
        let moderation_raw = doc.str_field("moderation").map_err(&err)?;
        let moderation = ModerationStatus::parse(moderation_raw)
            .ok_or_else(|| err(format!("unknown moderation status '{moderation_raw}'")))?;

        Ok(Track {
            id: TrackId::new(doc.str_field("id").map_err(&err)?),
            title: doc.str_field("title").map_err(&err)?.to_string(),
            artist: doc.str_field("artist").map_err(&err)?.to_string(),
            album: doc.opt_str_field("album").map_err(&err)?,
            duration_secs: doc.u32_field("duration_secs").map_err(&err)?,
            audio_url: doc.str_field("audio_url").map_err(&err)?.to_string(),
            cover_url: doc.opt_str_field("cover_url").map_err(&err)?,
            plays: doc.counter_field("plays").map_err(&err)?,
            likes: doc.counter_field("likes").map_err(&err)?,
            shares: doc.counter_field("shares").map_err(&err)?,
            liked: doc.flag_field("liked", false).map_err(&err)?,
            downloaded: doc.flag_field("downloaded", false).map_err(&err)?,
            in_playlist: doc.flag_field("in_playlist", false).map_err(&err)?,
            moderation,
        })
    }
}

impl FromDocument for VideoPost {
    const COLLECTION: &'static str = "posts";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);

        Ok(VideoPost {
            id: PostId::new(doc.str_field("id").map_err(&err)?),
            author_id: UserId::new(doc.str_field("author_id").map_err(&err)?),
            media_url: doc.str_field("media_url").map_err(&err)?.to_string(),
            thumbnail_url: doc.opt_str_field("thumbnail_url").map_err(&err)?,
            caption: doc.str_field("caption").map_err(&err)?.to_string(),
            hashtags: doc
                .str_list_field("hashtags")
                .map_err(&err)?
                .into_iter()
                .map(|tag| tag.to_lowercase())
                .collect(),
            likes: doc.counter_field("likes").map_err(&err)?,
            comments: doc.counter_field("comments").map_err(&err)?,
            shares: doc.counter_field("shares").map_err(&err)?,
            views: doc.counter_field("views").map_err(&err)?,
            liked: doc.flag_field("liked", false).map_err(&err)?,
            bookmarked: doc.flag_field("bookmarked", false).map_err(&err)?,
            created_at: doc.timestamp_field("created_at").map_err(&err)?,
        })
    }
}

impl FromDocument for Playlist {
    const COLLECTION: &'static str = "playlists";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);
        let tracks: Vec<TrackId> = doc
            .str_list_field("tracks")
            .map_err(&err)?
            .into_iter()
            .map(TrackId::new)
            .collect();

        let track_count = doc.u32_field("track_count").map_err(&err)?;
        if track_count as usize != tracks.len() {
            return Err(err(format!(
                "track_count {track_count} disagrees with {} tracks",
                tracks.len()
            )));
        }

        Ok(Playlist {
            id: PlaylistId::new(doc.str_field("id").map_err(&err)?),
            owner_id: UserId::new(doc.str_field("owner_id").map_err(&err)?),
            name: doc.str_field("name").map_err(&err)?.to_string(),
            tracks,
            track_count,
            total_duration_secs: doc.counter_field("total_duration_secs").map_err(&err)?,
            created_at: doc.timestamp_field("created_at").map_err(&err)?,
        })
    }
}

impl FromDocument for Event {
    const COLLECTION: &'static str = "events";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);

        let venue_doc = doc.doc_field("venue").map_err(&err)?;
        let venue = Venue {
            name: venue_doc.str_field("name").map_err(&err)?.to_string(),
            address: venue_doc.str_field("address").map_err(&err)?.to_string(),
            city: venue_doc.str_field("city").map_err(&err)?.to_string(),
            country: venue_doc.str_field("country").map_err(&err)?.to_string(),
        };

        let mut ticket_tiers = Vec::new();
        for tier_doc in doc.doc_list_field("ticket_tiers").map_err(&err)? {
            let quantity = tier_doc.u32_field("quantity").map_err(&err)?;
            let sold = tier_doc.u32_field("sold").map_err(&err)?;
            if sold > quantity {
                return Err(err(format!(
                    "tier sold {sold} exceeds quantity {quantity}"
                )));
            }
            ticket_tiers.push(TicketTier {
                name: tier_doc.str_field("name").map_err(&err)?.to_string(),
                price_cents: tier_doc.counter_field("price_cents").map_err(&err)?,
                quantity,
                sold,
                // Recomputed rather than trusted from the wire
                available: quantity - sold,
            });
        }

        let starts_at = doc.timestamp_field("starts_at").map_err(&err)?;
        let ends_at = doc.timestamp_field("ends_at").map_err(&err)?;
        if ends_at <= starts_at {
            return Err(err("event ends before it starts".to_string()));
        }

        Ok(Event {
            id: EventId::new(doc.str_field("id").map_err(&err)?),
            organizer_id: UserId::new(doc.str_field("organizer_id").map_err(&err)?),
            title: doc.str_field("title").map_err(&err)?.to_string(),
            venue,
            starts_at,
            ends_at,
            timezone: doc.str_field("timezone").map_err(&err)?.to_string(),
            ticket_tiers,
            views: doc.counter_field("views").map_err(&err)?,
            interested: doc.counter_field("interested").map_err(&err)?,
            attending: doc.counter_field("attending").map_err(&err)?,
            is_interested: doc.flag_field("is_interested", false).map_err(&err)?,
            is_attending: doc.flag_field("is_attending", false).map_err(&err)?,
        })
    }
}

impl FromDocument for Notification {
    const COLLECTION: &'static str = "notifications";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);
        let kind_raw = doc.str_field("kind").map_err(&err)?;
        let kind = NotificationKind::parse(kind_raw)
            .ok_or_else(|| err(format!("unknown notification kind '{kind_raw}'")))?;

        Ok(Notification {
            id: NotificationId::new(doc.str_field("id").map_err(&err)?),
            kind,
            message: doc.str_field("message").map_err(&err)?.to_string(),
            read: doc.flag_field("read", false).map_err(&err)?,
            created_at: doc.timestamp_field("created_at").map_err(&err)?,
            action_link: doc.opt_str_field("action_link").map_err(&err)?,
        })
    }
}

impl FromDocument for UserProfile {
    const COLLECTION: &'static str = "users";

    fn from_document(doc: &Document) -> Result<Self> {
        let err = decode_err(Self::COLLECTION);

        let role_raw = doc.str_field("role").map_err(&err)?;
        let role =
            UserRole::parse(role_raw).ok_or_else(|| err(format!("unknown role '{role_raw}'")))?;

        let verification_raw = doc.str_field("verification").map_err(&err)?;
        let verification = VerificationStatus::parse(verification_raw)
            .ok_or_else(|| err(format!("unknown verification status '{verification_raw}'")))?;

        Ok(UserProfile {
            id: UserId::new(doc.str_field("id").map_err(&err)?),
            display_name: doc.str_field("display_name").map_err(&err)?.to_string(),
            role,
            verification,
        })
    }
}
