//! Shared test doubles for store tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;
use vasilala_core::{
    AuthSession, CoreError, Document, DocumentGateway, DocumentPatch, IdentityGateway,
    QueryFilter, Result, SessionCallback, UserId, UserProfile, UserRole, VerificationStatus,
};

/// In-memory gateway stub with call counting, failure injection, and a gate
/// that holds reads open until released
#[derive(Default)]
pub struct StubGateway {
    pub documents: Mutex<Vec<Document>>,
    pub query_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub increments: Mutex<Vec<(String, String, i64)>>,
    pub unions: Mutex<Vec<(String, String, Value)>>,
    pub removals: Mutex<Vec<(String, String, Value)>>,
    gate_closed: AtomicBool,
    gate: Notify,
}

impl StubGateway {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Default::default()
        }
    }

    /// Hold every read open until `release` is called
    pub fn hold_reads(&self) {
        self.gate_closed.store(true, Ordering::SeqCst);
    }

    pub fn release_reads(&self) {
        self.gate_closed.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    async fn pass_gate(&self) {
        loop {
            let notified = self.gate.notified();
            if !self.gate_closed.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(CoreError::network("stub read failure"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(CoreError::network("stub write failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentGateway for StubGateway {
    async fn get(&self, _collection: &str, id: &str) -> Result<Document> {
        self.pass_gate().await;
        self.check_read()?;
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|doc| doc.str_field("id") == Ok(id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("document", id))
    }

    async fn query(
        &self,
        _collection: &str,
        _filter: &QueryFilter,
        limit: usize,
    ) -> Result<Vec<Document>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.check_read()?;
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().take(limit).cloned().collect())
    }

    async fn query_after(
        &self,
        _collection: &str,
        _filter: &QueryFilter,
        after_id: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.check_read()?;
        let documents = self.documents.lock().unwrap();
        let start = documents
            .iter()
            .position(|doc| doc.str_field("id") == Ok(after_id))
            .map_or(documents.len(), |position| position + 1);
        Ok(documents.iter().skip(start).take(limit).cloned().collect())
    }

    async fn create(&self, _collection: &str, document: Document) -> Result<String> {
        self.check_write()?;
        let id = document.str_field("id").unwrap_or("generated").to_string();
        self.documents.lock().unwrap().push(document);
        Ok(id)
    }

    async fn update(&self, _collection: &str, _id: &str, _patch: DocumentPatch) -> Result<()> {
        self.check_write()
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<()> {
        self.check_write()
    }

    async fn increment(&self, _collection: &str, id: &str, field: &str, delta: i64) -> Result<()> {
        self.check_write()?;
        self.increments
            .lock()
            .unwrap()
            .push((id.to_string(), field.to_string(), delta));
        Ok(())
    }

    async fn array_union(
        &self,
        _collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()> {
        self.check_write()?;
        self.unions
            .lock()
            .unwrap()
            .push((id.to_string(), field.to_string(), value));
        Ok(())
    }

    async fn array_remove(
        &self,
        _collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()> {
        self.check_write()?;
        self.removals
            .lock()
            .unwrap()
            .push((id.to_string(), field.to_string(), value));
        Ok(())
    }
}

/// Identity stub that records callbacks and can push session changes
#[derive(Default)]
pub struct StubIdentity {
    pub fail: AtomicBool,
    callbacks: Mutex<Vec<SessionCallback>>,
}

impl StubIdentity {
    /// Simulate a provider-side session change
    pub fn push_session(&self, session: Option<AuthSession>) {
        for callback in self.callbacks.lock().unwrap().iter() {
            callback(session.clone());
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(CoreError::auth("stub auth failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityGateway for StubIdentity {
    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        display_name: &str,
    ) -> Result<AuthSession> {
        self.check()?;
        Ok(AuthSession::new(UserProfile::new(
            UserId::generate(),
            display_name,
        )))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSession> {
        self.check()?;
        Ok(AuthSession::new(verified_artist(email)))
    }

    async fn sign_out(&self) -> Result<()> {
        self.check()
    }

    fn on_session_change(&self, callback: SessionCallback) {
        self.callbacks.lock().unwrap().push(callback);
    }
}

pub fn verified_artist(name: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(format!("user-{name}")),
        display_name: name.to_string(),
        role: UserRole::Artist,
        verification: VerificationStatus::Approved,
    }
}

// === Document builders ===

pub fn post_doc(id: &str, likes: u64, liked: bool) -> Document {
    Document::from_value(json!({
        "id": id,
        "author_id": "author-1",
        "media_url": format!("https://cdn.example/{id}.mp4"),
        "caption": format!("Clip {id} #dance"),
        "hashtags": ["dance"],
        "likes": likes,
        "comments": 0,
        "shares": 0,
        "views": 0,
        "liked": liked,
        "bookmarked": false,
        "created_at": "2026-06-01T10:00:00Z"
    }))
    .unwrap()
}

pub fn track_doc(id: &str, duration_secs: u32) -> Document {
    Document::from_value(json!({
        "id": id,
        "title": format!("Track {id}"),
        "artist": "Nova Pulse",
        "duration_secs": duration_secs,
        "audio_url": format!("https://cdn.example/{id}.mp3"),
        "plays": 0,
        "likes": 0,
        "shares": 0,
        "moderation": "approved"
    }))
    .unwrap()
}

pub fn playlist_doc(id: &str, owner: &str) -> Document {
    Document::from_value(json!({
        "id": id,
        "owner_id": owner,
        "name": format!("Playlist {id}"),
        "tracks": [],
        "track_count": 0,
        "total_duration_secs": 0,
        "created_at": "2026-06-01T10:00:00Z"
    }))
    .unwrap()
}

pub fn event_doc(id: &str, quantity: u32, sold: u32) -> Document {
    Document::from_value(json!({
        "id": id,
        "organizer_id": "organizer-1",
        "title": format!("Event {id}"),
        "venue": {
            "name": "Club Azul",
            "address": "Rua do Mar 7",
            "city": "Lisbon",
            "country": "Portugal"
        },
        "starts_at": "2026-08-01T21:00:00Z",
        "ends_at": "2026-08-02T03:00:00Z",
        "timezone": "Europe/Lisbon",
        "ticket_tiers": [
            { "name": "General", "price_cents": 2500, "quantity": quantity, "sold": sold }
        ],
        "views": 0,
        "interested": 5,
        "attending": 2,
        "is_interested": false,
        "is_attending": false
    }))
    .unwrap()
}

pub fn notification_doc(id: &str, created_at: &str, read: bool) -> Document {
    Document::from_value(json!({
        "id": id,
        "user_id": "user-1",
        "kind": "like",
        "message": format!("Someone liked {id}"),
        "read": read,
        "created_at": created_at
    }))
    .unwrap()
}
