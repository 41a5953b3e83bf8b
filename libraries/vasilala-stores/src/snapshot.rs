//! Paginated snapshot state shared by the domain stores
//!
//! Every store keeps a [`Page`] per collection: the in-memory items plus the
//! loading flag, error string, pagination cursor, and a generation counter.
//! The generation counter discards results of superseded fetches so a stale
//! response can never overwrite newer state.

use serde::Serialize;
use tracing::warn;
use vasilala_core::{Document, FromDocument, Result};

/// One store's view of a paginated collection
#[derive(Debug, Clone)]
pub struct Page<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    cursor: Option<String>,
    generation: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: false,
            cursor: None,
            generation: 0,
        }
    }
}

impl<T> Page<T> {
    /// Current items
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable items; only stores touch these
    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last fetch error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether another page may exist
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Begin a first-page load
    ///
    /// Returns the fetch generation, or `None` when a fetch is already in
    /// flight: the duplicate call must not issue a second gateway request.
    pub(crate) fn begin_load(&mut self) -> Option<u64> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.generation += 1;
        Some(self.generation)
    }

    /// Begin a next-page load keyed by the last-seen cursor
    ///
    /// `None` when already loading, exhausted, or never loaded.
    pub(crate) fn begin_load_more(&mut self) -> Option<(u64, String)> {
        if self.loading || !self.has_more {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.loading = true;
        self.error = None;
        self.generation += 1;
        Some((self.generation, cursor))
    }

    /// Drop all state and invalidate in-flight fetches
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.loading = false;
        self.error = None;
        self.has_more = false;
        self.cursor = None;
        self.generation += 1;
    }

    fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            // A newer load or reset superseded this fetch; discard it
            return false;
        }
        self.loading = false;
        true
    }

    fn apply_page(
        &mut self,
        items: Vec<T>,
        cursor: Option<String>,
        fetched: usize,
        page_size: usize,
        replace: bool,
    ) {
        if replace {
            self.items = items;
        } else {
            self.items.extend(items);
        }
        if cursor.is_some() {
            self.cursor = cursor;
        }
        self.has_more = fetched == page_size && page_size > 0;
        self.error = None;
    }
}

impl<T: FromDocument> Page<T> {
    /// Apply the outcome of a first-page fetch
    ///
    /// A failed fetch records the error and leaves prior items untouched.
    /// Returns whether the page changed (stale generations change nothing).
    pub(crate) fn apply_load_result(
        &mut self,
        generation: u64,
        result: Result<Vec<Document>>,
        page_size: usize,
    ) -> bool {
        if !self.finish(generation) {
            return false;
        }
        match result {
            Ok(documents) => {
                let fetched = documents.len();
                let cursor = page_cursor(&documents);
                let items = decode_documents(documents);
                self.apply_page(items, cursor, fetched, page_size, true);
            }
            Err(error) => self.error = Some(error.to_string()),
        }
        true
    }

    /// Apply the outcome of a next-page fetch (append)
    pub(crate) fn apply_load_more_result(
        &mut self,
        generation: u64,
        result: Result<Vec<Document>>,
        page_size: usize,
    ) -> bool {
        if !self.finish(generation) {
            return false;
        }
        match result {
            Ok(documents) => {
                let fetched = documents.len();
                let cursor = page_cursor(&documents);
                let items = decode_documents(documents);
                self.apply_page(items, cursor, fetched, page_size, false);
            }
            Err(error) => self.error = Some(error.to_string()),
        }
        true
    }
}

impl<T: Clone> Page<T> {
    /// Immutable snapshot for the watch channel
    pub fn snapshot(&self) -> PageSnapshot<T> {
        PageSnapshot {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error.clone(),
            has_more: self.has_more,
        }
    }
}

/// Immutable view published to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot<T> {
    /// Items in fetch order
    pub items: Vec<T>,
    /// Whether a fetch is in flight
    pub loading: bool,
    /// Last fetch error, if any
    pub error: Option<String>,
    /// Whether another page may exist
    pub has_more: bool,
}

impl<T> Default for PageSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: false,
        }
    }
}

/// Cursor for the page following these documents: the last-seen entity ID
fn page_cursor(documents: &[Document]) -> Option<String> {
    documents
        .last()
        .and_then(|doc| doc.str_field("id").ok().map(String::from))
}

/// Decode documents, skipping (and logging) malformed ones
fn decode_documents<T: FromDocument>(documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match T::from_document(&doc) {
            Ok(item) => Some(item),
            Err(error) => {
                warn!(collection = T::COLLECTION, %error, "skipping malformed document");
                None
            }
        })
        .collect()
}
