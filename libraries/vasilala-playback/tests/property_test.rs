//! Property-based tests for queue resolution
//!
//! Uses proptest to verify the navigation invariants across many random
//! queues and operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;
use vasilala_playback::{draw_permutation, Queue, QueueItem, RepeatMode};

fn arbitrary_item() -> impl Strategy<Value = QueueItem> {
    ("[a-z0-9]{1,12}", "[A-Za-z ]{1,30}", "[A-Za-z ]{1,20}", 1u64..600).prop_map(
        |(id, title, artist, duration_secs)| QueueItem {
            id,
            title,
            artist,
            duration: Some(Duration::from_secs(duration_secs)),
            media_url: "https://cdn.example/item.mp3".to_string(),
        },
    )
}

fn arbitrary_items() -> impl Strategy<Value = Vec<QueueItem>> {
    prop::collection::vec(arbitrary_item(), 1..40)
}

proptest! {
    /// Property: a permutation covers every index exactly once
    #[test]
    fn permutation_is_complete(len in 0usize..200, first in proptest::option::of(0usize..200)) {
        let first = first.filter(|&f| f < len);
        let order = draw_permutation(len, first);

        prop_assert_eq!(order.len(), len);
        let unique: HashSet<usize> = order.iter().copied().collect();
        prop_assert_eq!(unique.len(), len);
        if let Some(first) = first {
            prop_assert_eq!(order[0], first);
        }
    }

    /// Property: under repeat-all, N advances from the start return to the start
    #[test]
    fn repeat_all_wraps_to_start(items in arbitrary_items()) {
        let mut queue = Queue::new();
        let len = items.len();
        queue.set_items(items, 0);

        for _ in 0..len {
            prop_assert!(queue.advance(RepeatMode::All).is_some());
        }

        prop_assert_eq!(queue.position(), 0);
    }

    /// Property: without repeat, a queue yields each item exactly once
    #[test]
    fn sequential_playthrough_is_exhaustive(items in arbitrary_items(), shuffle in any::<bool>()) {
        let mut queue = Queue::new();
        let expected = items.len();
        queue.set_items(items, 0);
        if shuffle {
            queue.set_shuffle(true);
        }

        let mut played = 1; // the starting item
        while queue.advance(RepeatMode::Off).is_some() {
            played += 1;
            prop_assert!(played <= expected, "advance yielded more items than the queue holds");
        }

        prop_assert_eq!(played, expected);
    }

    /// Property: the queue stays consistent under arbitrary operations
    #[test]
    fn queue_consistency_under_operations(
        items in arbitrary_items(),
        operations in prop::collection::vec(0u8..5, 1..30)
    ) {
        let mut queue = Queue::new();
        queue.set_items(items.clone(), 0);

        for op in operations {
            match op {
                0 => {
                    queue.advance(RepeatMode::All);
                }
                1 => {
                    queue.step_back();
                }
                2 => {
                    if !queue.is_empty() {
                        queue.remove(queue.len() / 2);
                    }
                }
                3 => {
                    queue.set_shuffle(true);
                }
                _ => {
                    queue.set_shuffle(false);
                }
            }

            prop_assert!(queue.len() <= items.len());
            if queue.is_empty() {
                prop_assert!(queue.current().is_none());
            } else {
                prop_assert!(queue.position() < queue.len(), "cursor escaped the queue");
                prop_assert!(queue.current().is_some());
            }
            prop_assert!(queue.upcoming().len() < queue.len().max(1));
        }
    }

    /// Property: stepping back after advancing returns to the same item
    #[test]
    fn advance_then_step_back_roundtrips(items in arbitrary_items()) {
        prop_assume!(items.len() >= 2);

        let mut queue = Queue::new();
        queue.set_items(items, 0);
        let origin = queue.current().unwrap().id.clone();

        queue.advance(RepeatMode::Off).unwrap();
        let back = queue.step_back().unwrap();

        prop_assert_eq!(back.id, origin);
    }
}
