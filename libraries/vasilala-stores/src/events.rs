//! Events store
//!
//! Holds the events marketplace snapshot: cursor-paginated listings,
//! interest/attendance toggles, and ticket purchases. A purchase is
//! validated synchronously against the availability invariant before any
//! state change; the optimistic sale is rolled back if the remote write
//! fails.

use crate::optimistic::{spawn_write, toggle_counter};
use crate::snapshot::{Page, PageSnapshot};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use vasilala_core::gateway::collections;
use vasilala_core::{CoreError, DocumentGateway, Event, EventId, QueryFilter, Result};

/// Domain store for event listings and ticketing
pub struct EventsStore {
    gateway: Arc<dyn DocumentGateway>,
    state: Arc<RwLock<Page<Event>>>,
    snapshot_tx: watch::Sender<PageSnapshot<Event>>,
    page_size: usize,
}

impl EventsStore {
    /// Create an events store over the given gateway
    pub fn new(gateway: Arc<dyn DocumentGateway>, page_size: usize) -> Self {
        let (snapshot_tx, _) = watch::channel(PageSnapshot::default());
        Self {
            gateway,
            state: Arc::new(RwLock::new(Page::default())),
            snapshot_tx,
            page_size,
        }
    }

    /// Read-only snapshot subscription for the presentation layer
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<Event>> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the first page, replacing the snapshot
    pub async fn load(&self) {
        let Some(generation) = self.state.write().await.begin_load() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query(collections::EVENTS, &QueryFilter::new(), self.page_size)
            .await;

        let changed = self
            .state
            .write()
            .await
            .apply_load_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Fetch the next page keyed by the last-seen event ID
    pub async fn load_more(&self) {
        let Some((generation, cursor)) = self.state.write().await.begin_load_more() else {
            return;
        };
        self.publish().await;

        let result = self
            .gateway
            .query_after(
                collections::EVENTS,
                &QueryFilter::new(),
                &cursor,
                self.page_size,
            )
            .await;

        let changed = self
            .state
            .write()
            .await
            .apply_load_more_result(generation, result, self.page_size);
        if changed {
            self.publish().await;
        }
    }

    /// Drop all event state (sign-out)
    pub async fn reset(&self) {
        self.state.write().await.reset();
        self.publish().await;
    }

    // === Getters (pure projections, no I/O) ===

    /// An event by ID
    pub async fn event(&self, id: &EventId) -> Option<Event> {
        self.state
            .read()
            .await
            .items()
            .iter()
            .find(|event| &event.id == id)
            .cloned()
    }

    /// Case-insensitive substring search over title, venue, and city
    pub async fn search(&self, query: &str) -> Vec<Event> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.state
            .read()
            .await
            .items()
            .iter()
            .filter(|event| {
                event.title.to_lowercase().contains(&query)
                    || event.venue.name.to_lowercase().contains(&query)
                    || event.venue.city.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    // === Optimistic mutations ===

    /// Toggle the interested flag/counter pair
    pub async fn toggle_interested(&self, event_id: &EventId) -> Option<JoinHandle<()>> {
        self.toggle(event_id, InterestKind::Interested).await
    }

    /// Toggle the attending flag/counter pair
    pub async fn toggle_attending(&self, event_id: &EventId) -> Option<JoinHandle<()>> {
        self.toggle(event_id, InterestKind::Attending).await
    }

    /// Count a view of an event listing
    pub async fn record_view(&self, event_id: &EventId) -> Option<JoinHandle<()>> {
        {
            let mut page = self.state.write().await;
            let event = page
                .items_mut()
                .iter_mut()
                .find(|event| &event.id == event_id)?;
            event.views += 1;
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let id = event_id.as_str().to_string();
        let remote = async move { gateway.increment(collections::EVENTS, &id, "views", 1).await };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = event_id.clone();
        let compensate = async move {
            let mut page = state.write().await;
            if let Some(event) = page
                .items_mut()
                .iter_mut()
                .find(|event| event.id == rollback_id)
            {
                event.views = event.views.saturating_sub(1);
            }
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        Some(spawn_write("events.record_view", remote, compensate))
    }

    /// Purchase tickets from a tier
    ///
    /// Rejected synchronously, with no state change, when the event or tier
    /// is unknown or the request exceeds availability. On acceptance the
    /// sale is applied optimistically and rolled back if the remote write
    /// fails.
    pub async fn purchase_tickets(
        &self,
        event_id: &EventId,
        tier_index: usize,
        count: u32,
    ) -> Result<JoinHandle<()>> {
        {
            let mut page = self.state.write().await;
            let event = page
                .items_mut()
                .iter_mut()
                .find(|event| &event.id == event_id)
                .ok_or_else(|| CoreError::not_found("event", event_id.as_str()))?;
            let tier = event.ticket_tiers.get_mut(tier_index).ok_or_else(|| {
                CoreError::invalid_input(format!("no ticket tier at index {tier_index}"))
            })?;
            tier.purchase(count)?;
        }
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let id = event_id.as_str().to_string();
        let field = format!("ticket_tiers.{tier_index}.sold");
        let remote = async move {
            gateway
                .increment(collections::EVENTS, &id, &field, i64::from(count))
                .await
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = event_id.clone();
        let compensate = async move {
            let mut page = state.write().await;
            if let Some(tier) = page
                .items_mut()
                .iter_mut()
                .find(|event| event.id == rollback_id)
                .and_then(|event| event.ticket_tiers.get_mut(tier_index))
            {
                tier.refund(count);
            }
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        Ok(spawn_write("events.purchase_tickets", remote, compensate))
    }

    // === Internals ===

    async fn toggle(&self, event_id: &EventId, kind: InterestKind) -> Option<JoinHandle<()>> {
        let engaged = {
            let mut page = self.state.write().await;
            let event = page
                .items_mut()
                .iter_mut()
                .find(|event| &event.id == event_id)?;
            match kind {
                InterestKind::Interested => {
                    toggle_counter(&mut event.is_interested, &mut event.interested);
                    event.is_interested
                }
                InterestKind::Attending => {
                    toggle_counter(&mut event.is_attending, &mut event.attending);
                    event.is_attending
                }
            }
        };
        self.publish().await;

        let gateway = Arc::clone(&self.gateway);
        let id = event_id.as_str().to_string();
        let delta = if engaged { 1 } else { -1 };
        let remote = async move {
            gateway
                .increment(collections::EVENTS, &id, kind.counter_field(), delta)
                .await
        };

        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        let rollback_id = event_id.clone();
        let compensate = async move {
            let mut page = state.write().await;
            if let Some(event) = page
                .items_mut()
                .iter_mut()
                .find(|event| event.id == rollback_id)
            {
                match kind {
                    InterestKind::Interested => {
                        toggle_counter(&mut event.is_interested, &mut event.interested);
                    }
                    InterestKind::Attending => {
                        toggle_counter(&mut event.is_attending, &mut event.attending);
                    }
                }
            }
            let snapshot = page.snapshot();
            drop(page);
            snapshot_tx.send_replace(snapshot);
        };

        Some(spawn_write(kind.label(), remote, compensate))
    }

    async fn publish(&self) {
        let snapshot = self.state.read().await.snapshot();
        self.snapshot_tx.send_replace(snapshot);
    }
}

/// Which flag/counter pair a toggle targets
#[derive(Clone, Copy)]
enum InterestKind {
    Interested,
    Attending,
}

impl InterestKind {
    fn counter_field(self) -> &'static str {
        match self {
            InterestKind::Interested => "interested",
            InterestKind::Attending => "attending",
        }
    }

    fn label(self) -> &'static str {
        match self {
            InterestKind::Interested => "events.toggle_interested",
            InterestKind::Attending => "events.toggle_attending",
        }
    }
}
