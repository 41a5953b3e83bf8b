//! Shuffle permutation drawing
//!
//! Shuffle is permutation-based: a full permutation of the queue is drawn
//! when shuffle is enabled or the queue changes, then consumed in order.
//! Unlike re-sampling a random index on every "next", this guarantees every
//! item plays exactly once per cycle with no immediate repeats.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Draw a random permutation of `0..len`
///
/// When `first` is given, that index is moved to the front so the item the
/// user explicitly started keeps playing before the shuffled remainder.
pub fn draw_permutation(len: usize, first: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut thread_rng());

    if let Some(first) = first {
        if let Some(position) = order.iter().position(|&index| index == first) {
            order.swap(0, position);
        }
    }

    order
}
