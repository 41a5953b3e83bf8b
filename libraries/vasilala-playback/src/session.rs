//! Playback session - core orchestration
//!
//! Coordinates the queue, history, volume, and a platform media element into
//! one state machine. The session expresses intent to the element
//! (`set_source`/`play`/`pause`/`set_position`) and learns what actually
//! happened from the element's events; element failures degrade the state to
//! paused or idle, never a panic or a silent hang.

use crate::element::{MediaElement, MediaEvent};
use crate::events::PlaybackEvent;
use crate::history::History;
use crate::queue::Queue;
use crate::types::{PlaybackConfig, PreviousPolicy, QueueItem, RepeatMode, SessionState};
use crate::volume::Volume;
use std::time::Duration;

/// State machine over a single playable unit and its queue
pub struct PlaybackSession {
    element: Box<dyn MediaElement>,
    queue: Queue,
    history: History,
    volume: Volume,
    state: SessionState,
    current: Option<QueueItem>,
    position: Duration,
    duration: Option<Duration>,
    repeat: RepeatMode,
    previous_policy: PreviousPolicy,
    restart_threshold: Duration,
    last_error: Option<String>,
    events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Create a session driving the given element
    pub fn new(mut element: Box<dyn MediaElement>, config: PlaybackConfig) -> Self {
        let volume = Volume::new(config.initial_volume);
        element.set_volume(volume.gain());

        let mut queue = Queue::new();
        if config.shuffle {
            queue.set_shuffle(true);
        }

        Self {
            element,
            queue,
            history: History::new(config.history_size),
            volume,
            state: SessionState::Idle,
            current: None,
            position: Duration::ZERO,
            duration: None,
            repeat: config.repeat,
            previous_policy: config.previous_policy,
            restart_threshold: config.previous_restart_threshold,
            last_error: None,
            events: Vec::new(),
        }
    }

    // === Playback control ===

    /// Start playing `item`
    ///
    /// A supplied queue replaces the active one, positioned at `item`
    /// (inserted at the front if absent). Without a queue the item plays as
    /// a singleton queue.
    pub fn play(&mut self, item: QueueItem, queue: Option<Vec<QueueItem>>) {
        let mut items = queue.unwrap_or_else(|| vec![item.clone()]);
        let start = match items.iter().position(|entry| entry.id == item.id) {
            Some(position) => position,
            None => {
                items.insert(0, item.clone());
                0
            }
        };

        self.queue.set_items(items, start);
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.change_item(item, true);
    }

    /// Toggle between playing and paused
    ///
    /// Valid only from `Playing`/`Paused`; a no-op from every other state.
    pub fn toggle_playback(&mut self) {
        match self.state {
            SessionState::Playing => {
                self.element.pause();
                self.set_state(SessionState::Paused);
            }
            SessionState::Paused => self.try_start(),
            _ => {}
        }
    }

    /// Skip to the next item per repeat/shuffle resolution
    pub fn next(&mut self) {
        if self.current.is_none() {
            return;
        }

        if self.repeat == RepeatMode::One {
            // Repeat-one replays the current item even on explicit skip
            self.restart_current();
            return;
        }

        match self.queue.advance(self.repeat) {
            Some(item) => self.change_item(item, true),
            None => self.stop_exhausted(),
        }
    }

    /// Step back per the configured previous-track policy
    ///
    /// Past the restart threshold this restarts the current item instead of
    /// navigating.
    pub fn previous(&mut self) {
        if self.current.is_none() {
            return;
        }

        if self.position > self.restart_threshold {
            self.restart_current();
            return;
        }

        let prior = match self.previous_policy {
            PreviousPolicy::QueuePointer => self.queue.step_back(),
            PreviousPolicy::HistoryStack => self.history.pop(),
        };

        match prior {
            // Navigating back must not re-record the current item
            Some(item) => self.change_item(item, false),
            None => self.restart_current(),
        }
    }

    /// Seek, clamped to `[0, duration]`
    ///
    /// Writes through to the element; the local position updates on the
    /// next `TimeUpdate`, never synchronously.
    pub fn seek(&mut self, position: Duration) {
        if self.current.is_none() {
            return;
        }
        let clamped = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        self.element.set_position(clamped);
    }

    /// Stop playback and clear the current item
    pub fn stop(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.element.pause();
        self.current = None;
        self.position = Duration::ZERO;
        self.duration = None;
        self.set_state(SessionState::Idle);
    }

    // === Volume ===

    /// Set the volume level, clamped to `[0.0, 1.0]`
    ///
    /// Never touches the mute flag; `toggle_mute` owns it.
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.element.set_volume(self.volume.gain());
        self.emit_volume();
    }

    /// Toggle the mute flag
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.element.set_volume(self.volume.gain());
        self.emit_volume();
    }

    // === Modes and queue ===

    /// Set the repeat mode
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    /// Enable or disable shuffle, preserving the current item
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.queue.set_shuffle(enabled);
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Select the previous-track policy
    pub fn set_previous_policy(&mut self, policy: PreviousPolicy) {
        self.previous_policy = policy;
    }

    /// Clear the queue; the current item keeps playing until it ends
    pub fn clear_queue(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.queue.clear();
        self.emit(PlaybackEvent::QueueChanged { length: 0 });
    }

    /// Remove the queue item at catalog index `index`
    pub fn remove_from_queue(&mut self, index: usize) -> Option<QueueItem> {
        let removed = self.queue.remove(index);
        if removed.is_some() {
            self.emit(PlaybackEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
        removed
    }

    // === Element events ===

    /// Feed an element event into the state machine
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.duration = Some(duration);
                self.emit_position();
            }
            MediaEvent::TimeUpdate { position } => {
                self.position = match self.duration {
                    Some(duration) => position.min(duration),
                    None => position,
                };
                if self.state == SessionState::Loading {
                    self.set_state(SessionState::Playing);
                }
                self.emit_position();
            }
            MediaEvent::Ended => {
                if self.current.is_some() {
                    self.set_state(SessionState::Ended);
                    self.resolve_ended();
                }
            }
            MediaEvent::Failed { message } => {
                self.last_error = Some(message.clone());
                self.element.pause();
                let degraded = if self.current.is_some() {
                    SessionState::Paused
                } else {
                    SessionState::Idle
                };
                self.set_state(degraded);
                self.emit(PlaybackEvent::PlaybackFailed { message });
            }
        }
    }

    // === Accessors ===

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current item, if any
    pub fn current(&self) -> Option<&QueueItem> {
        self.current.as_ref()
    }

    /// Position as last reported by the element
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Duration as resolved by the element, if known
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Volume level (preserved while muted)
    pub fn volume_level(&self) -> f32 {
        self.volume.level()
    }

    /// Whether the mute flag is set
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Whether output is silent, by flag or zero level
    pub fn is_effectively_muted(&self) -> bool {
        self.volume.is_effectively_muted()
    }

    /// Active repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// The playback queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Played-item history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Last playback error, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drain events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    // === Internals ===

    fn change_item(&mut self, next: QueueItem, record_history: bool) {
        let previous = self.current.take();
        let previous_item_id = previous.as_ref().map(|item| item.id.clone());
        if record_history {
            if let Some(previous) = previous {
                self.history.push(previous);
            }
        }

        self.element.set_source(&next.media_url);
        self.position = Duration::ZERO;
        self.duration = None;
        self.emit(PlaybackEvent::ItemChanged {
            item_id: next.id.clone(),
            previous_item_id,
        });
        self.current = Some(next);
        self.set_state(SessionState::Loading);
        self.try_start();
    }

    fn restart_current(&mut self) {
        self.position = Duration::ZERO;
        self.element.set_position(Duration::ZERO);
        if self.state == SessionState::Ended {
            self.set_state(SessionState::Loading);
            self.try_start();
        }
    }

    fn resolve_ended(&mut self) {
        if self.repeat == RepeatMode::One {
            self.restart_current();
            return;
        }

        match self.queue.advance(self.repeat) {
            Some(item) => self.change_item(item, true),
            None => self.stop_exhausted(),
        }
    }

    fn stop_exhausted(&mut self) {
        self.element.pause();
        self.current = None;
        self.position = Duration::ZERO;
        self.duration = None;
        self.set_state(SessionState::Idle);
    }

    /// Ask the element to start; degrade instead of propagating failure
    fn try_start(&mut self) {
        match self.element.play() {
            Ok(()) => {
                if self.state == SessionState::Paused {
                    self.set_state(SessionState::Playing);
                }
                // From Loading the session waits for the first TimeUpdate
            }
            Err(error) => {
                let message = error.to_string();
                self.last_error = Some(message.clone());
                if self.current.is_some() {
                    self.set_state(SessionState::Paused);
                } else {
                    self.set_state(SessionState::Idle);
                }
                self.emit(PlaybackEvent::PlaybackFailed { message });
            }
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            position: self.position,
            duration: self.duration,
        });
    }

    fn emit_volume(&mut self) {
        self.emit(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }
}
