//! Integration tests for the playback session state machine
//!
//! Drives the session against a recording fake element: tests observe both
//! the session's derived state and the imperative calls issued to the
//! element.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use vasilala_playback::{
    MediaElement, MediaEvent, PlaybackConfig, PlaybackEvent, PlaybackSession, PreviousPolicy,
    QueueItem, RepeatMode, Result as PlaybackResult, SessionState,
};

#[derive(Default)]
struct ElementLog {
    sources: Vec<String>,
    play_calls: u32,
    pause_calls: u32,
    positions: Vec<Duration>,
    volumes: Vec<f32>,
    reject_play: bool,
}

/// Media element fake recording every call
struct FakeElement(Arc<Mutex<ElementLog>>);

impl FakeElement {
    fn new() -> (Self, Arc<Mutex<ElementLog>>) {
        let log = Arc::new(Mutex::new(ElementLog::default()));
        (Self(Arc::clone(&log)), log)
    }
}

impl MediaElement for FakeElement {
    fn set_source(&mut self, url: &str) {
        self.0.lock().unwrap().sources.push(url.to_string());
    }

    fn play(&mut self) -> PlaybackResult<()> {
        let mut log = self.0.lock().unwrap();
        log.play_calls += 1;
        if log.reject_play {
            Err(vasilala_playback::PlaybackError::Element(
                "autoplay blocked".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.0.lock().unwrap().pause_calls += 1;
    }

    fn set_position(&mut self, position: Duration) {
        self.0.lock().unwrap().positions.push(position);
    }

    fn set_volume(&mut self, gain: f32) {
        self.0.lock().unwrap().volumes.push(gain);
    }
}

fn item(id: &str) -> QueueItem {
    QueueItem {
        id: id.to_string(),
        title: format!("Title {id}"),
        artist: "Test Artist".to_string(),
        duration: Some(Duration::from_secs(180)),
        media_url: format!("https://cdn.example/{id}.mp3"),
    }
}

fn items(ids: &[&str]) -> Vec<QueueItem> {
    ids.iter().map(|id| item(id)).collect()
}

fn new_session(config: PlaybackConfig) -> (PlaybackSession, Arc<Mutex<ElementLog>>) {
    let (element, log) = FakeElement::new();
    (PlaybackSession::new(Box::new(element), config), log)
}

#[test]
fn play_goes_loading_then_playing_on_first_time_update() {
    let (mut session, log) = new_session(PlaybackConfig::default());

    session.play(item("a"), None);
    assert_eq!(session.state(), SessionState::Loading);
    assert_eq!(log.lock().unwrap().sources, vec!["https://cdn.example/a.mp3"]);

    session.handle_media_event(MediaEvent::TimeUpdate {
        position: Duration::from_millis(250),
    });
    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.position(), Duration::from_millis(250));
}

#[test]
fn duration_resolves_only_from_metadata_event() {
    let (mut session, _log) = new_session(PlaybackConfig::default());

    session.play(item("a"), None);
    assert_eq!(session.duration(), None);

    session.handle_media_event(MediaEvent::LoadedMetadata {
        duration: Duration::from_secs(180),
    });
    assert_eq!(session.duration(), Some(Duration::from_secs(180)));
}

#[test]
fn repeat_one_replays_current_forever() {
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.set_repeat(RepeatMode::One);
    session.play(item("x"), Some(items(&["x", "y", "z"])));

    for _ in 0..3 {
        session.handle_media_event(MediaEvent::TimeUpdate {
            position: Duration::from_secs(179),
        });
        session.handle_media_event(MediaEvent::Ended);

        assert_eq!(session.current().unwrap().id, "x");
        assert_eq!(session.position(), Duration::ZERO);
    }

    // Queue pointer never moved
    assert_eq!(session.queue().position(), 0);
    // Each replay rewound the element
    assert_eq!(
        log.lock().unwrap().positions,
        vec![Duration::ZERO, Duration::ZERO, Duration::ZERO]
    );
}

#[test]
fn repeat_all_wraps_after_full_cycle() {
    let (mut session, _log) = new_session(PlaybackConfig::default());
    session.set_repeat(RepeatMode::All);
    session.play(item("a"), Some(items(&["a", "b", "c"])));

    let mut played = Vec::new();
    for _ in 0..3 {
        session.next();
        played.push(session.current().unwrap().id.clone());
    }

    assert_eq!(played, vec!["b", "c", "a"]);
    assert_eq!(session.queue().position(), 0);
}

#[test]
fn exhausted_queue_without_repeat_goes_idle() {
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.play(item("a"), Some(items(&["a", "b"])));
    session.next();
    assert_eq!(session.current().unwrap().id, "b");

    session.handle_media_event(MediaEvent::Ended);

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.current().is_none());
    assert!(log.lock().unwrap().pause_calls >= 1);
}

#[test]
fn ended_advances_through_queue() {
    let (mut session, _log) = new_session(PlaybackConfig::default());
    session.play(item("a"), Some(items(&["a", "b", "c"])));

    session.handle_media_event(MediaEvent::Ended);
    assert_eq!(session.current().unwrap().id, "b");
    assert_eq!(session.state(), SessionState::Loading);

    session.handle_media_event(MediaEvent::Ended);
    assert_eq!(session.current().unwrap().id, "c");
}

#[test]
fn previous_restarts_past_threshold() {
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.play(item("b"), Some(items(&["a", "b"])));
    session.handle_media_event(MediaEvent::TimeUpdate {
        position: Duration::from_secs(10),
    });

    session.previous();

    // Still on the same item, element rewound to zero
    assert_eq!(session.current().unwrap().id, "b");
    assert_eq!(session.position(), Duration::ZERO);
    assert_eq!(log.lock().unwrap().positions.last(), Some(&Duration::ZERO));
    assert_eq!(session.queue().position(), 1);
}

#[test]
fn previous_with_queue_pointer_steps_back() {
    let (mut session, _log) = new_session(PlaybackConfig::default());
    session.play(item("a"), Some(items(&["a", "b", "c"])));
    session.next();
    session.next();
    assert_eq!(session.current().unwrap().id, "c");

    session.previous();
    assert_eq!(session.current().unwrap().id, "b");
}

#[test]
fn previous_policies_diverge_across_queue_replacement() {
    // Queue-pointer previous cannot leave the replaced queue...
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.play(item("a"), None);
    session.play(item("b"), None);

    session.previous();
    assert_eq!(session.current().unwrap().id, "b");
    assert_eq!(log.lock().unwrap().positions.last(), Some(&Duration::ZERO));

    // ...while history-stack previous navigates back to the played item
    let config = PlaybackConfig {
        previous_policy: PreviousPolicy::HistoryStack,
        ..Default::default()
    };
    let (mut session, _log) = new_session(config);
    session.play(item("a"), None);
    session.play(item("b"), None);

    session.previous();
    assert_eq!(session.current().unwrap().id, "a");
}

#[test]
fn toggle_pauses_and_resumes() {
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.play(item("a"), None);
    session.handle_media_event(MediaEvent::TimeUpdate {
        position: Duration::from_secs(1),
    });
    assert_eq!(session.state(), SessionState::Playing);

    session.toggle_playback();
    assert_eq!(session.state(), SessionState::Paused);
    assert_eq!(log.lock().unwrap().pause_calls, 1);

    session.toggle_playback();
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn zero_volume_is_not_the_mute_flag() {
    let (mut session, log) = new_session(PlaybackConfig::default());

    session.set_volume(0.0);
    assert!(session.is_effectively_muted());
    assert!(!session.is_muted());

    session.set_volume(2.0);
    assert_eq!(session.volume_level(), 1.0);

    session.toggle_mute();
    assert!(session.is_muted());
    assert_eq!(session.volume_level(), 1.0);
    assert_eq!(log.lock().unwrap().volumes.last(), Some(&0.0));

    session.toggle_mute();
    assert_eq!(log.lock().unwrap().volumes.last(), Some(&1.0));
}

#[test]
fn autoplay_rejection_degrades_to_paused() {
    let (element, log) = FakeElement::new();
    log.lock().unwrap().reject_play = true;
    let mut session = PlaybackSession::new(Box::new(element), PlaybackConfig::default());

    session.play(item("a"), None);

    assert_eq!(session.state(), SessionState::Paused);
    assert!(session.last_error().unwrap().contains("autoplay blocked"));
    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, PlaybackEvent::PlaybackFailed { .. })));
}

#[test]
fn element_failure_mid_playback_degrades() {
    let (mut session, _log) = new_session(PlaybackConfig::default());
    session.play(item("a"), None);
    session.handle_media_event(MediaEvent::TimeUpdate {
        position: Duration::from_secs(5),
    });

    session.handle_media_event(MediaEvent::Failed {
        message: "network stall".to_string(),
    });

    assert_eq!(session.state(), SessionState::Paused);
    assert_eq!(session.last_error(), Some("network stall"));
}

#[test]
fn shuffled_ended_cycle_plays_every_item_once() {
    let config = PlaybackConfig {
        shuffle: true,
        ..Default::default()
    };
    let (mut session, _log) = new_session(config);
    session.play(item("a"), Some(items(&["a", "b", "c", "d", "e"])));

    let mut played = vec![session.current().unwrap().id.clone()];
    loop {
        session.handle_media_event(MediaEvent::Ended);
        match session.current() {
            Some(current) => played.push(current.id.clone()),
            None => break,
        }
    }

    played.sort();
    assert_eq!(played, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn item_change_events_carry_previous_id() {
    let (mut session, _log) = new_session(PlaybackConfig::default());
    session.play(item("a"), Some(items(&["a", "b"])));
    session.drain_events();

    session.next();
    let events = session.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        PlaybackEvent::ItemChanged { item_id, previous_item_id }
            if item_id == "b" && previous_item_id.as_deref() == Some("a")
    )));
}

#[test]
fn seek_clamps_to_duration_and_stays_derived() {
    let (mut session, log) = new_session(PlaybackConfig::default());
    session.play(item("a"), None);
    session.handle_media_event(MediaEvent::LoadedMetadata {
        duration: Duration::from_secs(100),
    });

    session.seek(Duration::from_secs(250));
    assert_eq!(
        log.lock().unwrap().positions.last(),
        Some(&Duration::from_secs(100))
    );
    // Position only moves when the element reports it
    assert_eq!(session.position(), Duration::ZERO);

    session.handle_media_event(MediaEvent::TimeUpdate {
        position: Duration::from_secs(100),
    });
    assert_eq!(session.position(), Duration::from_secs(100));
}
