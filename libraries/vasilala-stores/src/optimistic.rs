//! Optimistic mutation helper
//!
//! Every optimistic mutation pairs a synchronous local change with a
//! fire-and-forget remote write and a mandatory compensation: if the remote
//! write fails, the local change is rolled back and the failure logged. The
//! compensation is required at the type level so no call site can opt out,
//! and counter decrements saturate at zero under every interleaving.

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vasilala_core::Result;

/// Flip a flag/counter pair in place
///
/// Engaging the flag increments the counter; disengaging decrements it,
/// clamped at zero so a stale snapshot can never render a negative count.
pub(crate) fn toggle_counter(flag: &mut bool, counter: &mut u64) {
    if *flag {
        *counter = counter.saturating_sub(1);
    } else {
        *counter += 1;
    }
    *flag = !*flag;
}

/// Spawn the remote half of an optimistic mutation
///
/// `remote` is the gateway write; `compensate` must undo the local change
/// and republish, and runs only when the write fails. The returned handle
/// lets a caller await or abort the in-flight write; dropping it detaches.
pub(crate) fn spawn_write<R, C>(label: &'static str, remote: R, compensate: C) -> JoinHandle<()>
where
    R: Future<Output = Result<()>> + Send + 'static,
    C: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        match remote.await {
            Ok(()) => debug!(label, "remote write confirmed"),
            Err(error) => {
                warn!(label, %error, "remote write failed; rolling back optimistic change");
                compensate.await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_engages_and_disengages() {
        let mut liked = false;
        let mut likes = 10;

        toggle_counter(&mut liked, &mut likes);
        assert!(liked);
        assert_eq!(likes, 11);

        toggle_counter(&mut liked, &mut likes);
        assert!(!liked);
        assert_eq!(likes, 10);
    }

    #[test]
    fn disengage_clamps_at_zero() {
        // A stale snapshot can pair an engaged flag with a zero counter
        let mut liked = true;
        let mut likes = 0;

        toggle_counter(&mut liked, &mut likes);
        assert!(!liked);
        assert_eq!(likes, 0);
    }
}
