//! Property-based tests for store invariants
//!
//! Uses proptest to verify the counter, aggregate, and availability
//! invariants across many random operation sequences.

mod common;

use common::{post_doc, StubGateway};
use proptest::prelude::*;
use std::sync::Arc;
use vasilala_core::{Playlist, PostId, TicketTier, Track, TrackId, UserId};
use vasilala_stores::FeedStore;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

fn test_track(id: usize, duration_secs: u32) -> Track {
    let mut track = Track::new(
        format!("Track {id}"),
        "Artist",
        duration_secs,
        format!("https://cdn.example/{id}.mp3"),
    );
    track.id = TrackId::new(format!("t{id}"));
    track
}

proptest! {
    /// Property: the displayed like counter never goes negative and always
    /// matches the saturating model, for any initial state and toggle count
    #[test]
    fn like_counter_never_negative(
        initial_likes in 0u64..5,
        initially_liked in any::<bool>(),
        toggles in 1usize..20
    ) {
        runtime().block_on(async move {
            let gateway = Arc::new(StubGateway::with_documents(vec![post_doc(
                "p1",
                initial_likes,
                initially_liked,
            )]));
            let store = FeedStore::new(gateway, 10);
            store.load().await;
            let id = PostId::new("p1");

            let mut model_likes = initial_likes;
            let mut model_liked = initially_liked;

            for _ in 0..toggles {
                let handle = store.toggle_like(&id).await.expect("post present");
                handle.await.expect("write task");

                if model_liked {
                    model_likes = model_likes.saturating_sub(1);
                } else {
                    model_likes += 1;
                }
                model_liked = !model_liked;

                let post = store.post(&id).await.expect("post present");
                prop_assert_eq!(post.likes, model_likes);
                prop_assert_eq!(post.liked, model_liked);
            }
            Ok(())
        })?;
    }

    /// Property: playlist aggregates stay consistent with the track list
    /// after every add/remove in any order
    #[test]
    fn playlist_aggregates_stay_consistent(
        durations in prop::collection::vec(1u32..600, 1..15),
        operations in prop::collection::vec((any::<bool>(), 0usize..15), 1..40)
    ) {
        let tracks: Vec<Track> = durations
            .iter()
            .enumerate()
            .map(|(id, &duration)| test_track(id, duration))
            .collect();

        let mut playlist = Playlist::new(UserId::new("u1"), "Mix");

        for (add, index) in operations {
            let track = &tracks[index % tracks.len()];
            if add {
                // Duplicate adds are rejected without touching aggregates
                let _ = playlist.add_track(track);
            } else {
                playlist.remove_track(&track.id, track.duration_secs);
            }

            prop_assert_eq!(playlist.track_count as usize, playlist.tracks.len());
            let expected: u64 = playlist
                .tracks
                .iter()
                .map(|id| {
                    tracks
                        .iter()
                        .find(|track| &track.id == id)
                        .map(|track| u64::from(track.duration_secs))
                        .unwrap_or(0)
                })
                .sum();
            prop_assert_eq!(playlist.total_duration_secs, expected);
        }
    }

    /// Property: availability always equals quantity minus sold, never goes
    /// negative, and rejected purchases change nothing
    #[test]
    fn ticket_availability_invariant(
        quantity in 1u32..200,
        requests in prop::collection::vec(0u32..50, 1..30)
    ) {
        let mut tier = TicketTier::new("General", 2500, quantity);

        for count in requests {
            let before = tier.clone();
            let accepted = tier.purchase(count).is_ok();

            if accepted {
                prop_assert!(count > 0 && count <= before.available);
            } else {
                prop_assert_eq!(&tier, &before, "rejected purchase must not change state");
            }

            prop_assert_eq!(tier.available, tier.quantity - tier.sold);
            prop_assert!(tier.sold <= tier.quantity);
        }
    }
}
