//! Bounded history of played items
//!
//! Backs the `HistoryStack` previous-track policy: the most recently played
//! item is popped off when the user steps back. Oldest entries are discarded
//! once the bound is reached.

use crate::types::QueueItem;
use std::collections::VecDeque;

/// Ring of recently played items (most recent at the back)
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<QueueItem>,
    limit: usize,
}

impl History {
    /// Create a history bounded at `limit` entries
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record a played item, discarding the oldest entry when full
    pub fn push(&mut self, item: QueueItem) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
    }

    /// Pop the most recently played item
    pub fn pop(&mut self) -> Option<QueueItem> {
        self.entries.pop_back()
    }

    /// Most recently played item, without removing it
    pub fn peek(&self) -> Option<&QueueItem> {
        self.entries.back()
    }

    /// Played items, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &QueueItem> {
        self.entries.iter()
    }

    /// Number of recorded items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
