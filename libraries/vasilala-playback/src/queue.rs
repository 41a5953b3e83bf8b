//! Playback queue with cursor-based navigation
//!
//! The queue never discards items as they play: a cursor walks an order
//! permutation (identity when shuffle is off), so "previous" can navigate
//! backwards without restructuring.

use crate::shuffle::draw_permutation;
use crate::types::{QueueItem, RepeatMode};

/// Ordered playback queue
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Items in catalog order
    items: Vec<QueueItem>,

    /// Play order: a permutation of item indices (identity when unshuffled)
    order: Vec<usize>,

    /// Position in `order` of the current item
    cursor: usize,

    /// Whether `order` is a shuffle permutation
    shuffled: bool,
}

impl Queue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents, starting playback at `start`
    ///
    /// With shuffle enabled a fresh permutation is drawn with `start`
    /// pinned first; otherwise the cursor is placed on `start` directly.
    pub fn set_items(&mut self, items: Vec<QueueItem>, start: usize) {
        self.items = items;
        self.rebuild_order(Some(start));
    }

    /// Enable or disable shuffle, preserving the current item
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffled == enabled {
            return;
        }

        let current_index = self.order.get(self.cursor).copied();
        self.shuffled = enabled;

        if enabled {
            self.order = draw_permutation(self.items.len(), current_index);
            self.cursor = 0;
        } else {
            self.order = (0..self.items.len()).collect();
            self.cursor = current_index.unwrap_or(0);
        }
    }

    /// Whether the queue is currently shuffled
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// The current item, if any
    pub fn current(&self) -> Option<&QueueItem> {
        self.order.get(self.cursor).map(|&index| &self.items[index])
    }

    /// Advance to the next item
    ///
    /// Sequential (or permutation-order) advance; wraps to the start under
    /// `RepeatMode::All`, re-drawing the permutation for a fresh shuffle
    /// cycle. Returns `None` when the queue is exhausted and repeat is off.
    /// `RepeatMode::One` is resolved by the session before the queue is
    /// consulted, so it never moves the cursor here.
    pub fn advance(&mut self, repeat: RepeatMode) -> Option<QueueItem> {
        if self.order.is_empty() {
            return None;
        }

        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
        } else if repeat == RepeatMode::All {
            if self.shuffled {
                self.order = draw_permutation(self.items.len(), None);
            }
            self.cursor = 0;
        } else {
            return None;
        }

        self.current().cloned()
    }

    /// Step the cursor back one position
    pub fn step_back(&mut self) -> Option<QueueItem> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current().cloned()
    }

    /// Remove the item at catalog index `index`
    ///
    /// The cursor keeps pointing at the current item; removing the current
    /// item moves it to the next one (or the new last).
    pub fn remove(&mut self, index: usize) -> Option<QueueItem> {
        if index >= self.items.len() {
            return None;
        }

        let removed = self.items.remove(index);
        let order_position = self
            .order
            .iter()
            .position(|&i| i == index)
            .expect("order always covers every item index");

        self.order.remove(order_position);
        for entry in &mut self.order {
            if *entry > index {
                *entry -= 1;
            }
        }

        if order_position < self.cursor {
            self.cursor -= 1;
        } else if self.cursor >= self.order.len() && !self.order.is_empty() {
            self.cursor = self.order.len() - 1;
        }

        Some(removed)
    }

    /// Items still ahead of the cursor, in play order
    pub fn upcoming(&self) -> Vec<&QueueItem> {
        self.order
            .iter()
            .skip(self.cursor + 1)
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Cursor position in play order
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of items in the queue
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clear the queue
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        self.cursor = 0;
    }

    fn rebuild_order(&mut self, start: Option<usize>) {
        if self.shuffled {
            self.order = draw_permutation(self.items.len(), start);
            self.cursor = 0;
        } else {
            self.order = (0..self.items.len()).collect();
            self.cursor = start
                .unwrap_or(0)
                .min(self.items.len().saturating_sub(1));
        }
    }
}
