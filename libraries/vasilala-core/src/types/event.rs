/// Event and ticketing domain types
use crate::error::{CoreError, Result};
use crate::types::{EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical venue of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue name
    pub name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
}

/// One purchasable category of event entry
///
/// Invariant: `available == quantity - sold` and `available` never goes
/// negative. `purchase` is the only way to consume availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    /// Tier name (e.g. "Early Bird")
    pub name: String,

    /// Price in minor currency units
    pub price_cents: u64,

    /// Total tickets issued for this tier
    pub quantity: u32,

    /// Tickets sold so far
    pub sold: u32,

    /// Tickets still available; always `quantity - sold`
    pub available: u32,
}

impl TicketTier {
    /// Create a new tier with nothing sold
    pub fn new(name: impl Into<String>, price_cents: u64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price_cents,
            quantity,
            sold: 0,
            available: quantity,
        }
    }

    /// Sell `count` tickets
    ///
    /// A request exceeding availability is rejected and produces no state
    /// change.
    pub fn purchase(&mut self, count: u32) -> Result<()> {
        if count == 0 {
            return Err(CoreError::invalid_input("ticket count must be positive"));
        }
        if count > self.available {
            return Err(CoreError::invalid_input(format!(
                "requested {count} tickets, only {} available",
                self.available
            )));
        }

        self.sold += count;
        self.available = self.quantity - self.sold;
        Ok(())
    }

    /// Return `count` tickets to the pool
    ///
    /// Used to roll back an optimistic purchase whose remote write failed.
    pub fn refund(&mut self, count: u32) {
        self.sold = self.sold.saturating_sub(count);
        self.available = self.quantity - self.sold;
    }

    /// Whether the tier is sold out
    pub fn is_sold_out(&self) -> bool {
        self.available == 0
    }
}

/// An event listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,

    /// Organizer user ID
    pub organizer_id: UserId,

    /// Event title
    pub title: String,

    /// Venue details
    pub venue: Venue,

    /// Event start (UTC)
    pub starts_at: DateTime<Utc>,

    /// Event end (UTC); always after `starts_at`
    pub ends_at: DateTime<Utc>,

    /// IANA timezone name of the venue (e.g. "Europe/Lisbon")
    pub timezone: String,

    /// Ticket tiers
    pub ticket_tiers: Vec<TicketTier>,

    /// View counter
    pub views: u64,

    /// Interested counter
    pub interested: u64,

    /// Attending counter
    pub attending: u64,

    /// Whether the signed-in user marked interest
    pub is_interested: bool,

    /// Whether the signed-in user marked attendance
    pub is_attending: bool,
}

impl Event {
    /// Create a new event listing
    ///
    /// Rejects a time window whose end does not follow its start.
    pub fn new(
        organizer_id: UserId,
        title: impl Into<String>,
        venue: Venue,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        timezone: impl Into<String>,
    ) -> Result<Self> {
        if ends_at <= starts_at {
            return Err(CoreError::invalid_input("event must end after it starts"));
        }

        Ok(Self {
            id: EventId::generate(),
            organizer_id,
            title: title.into(),
            venue,
            starts_at,
            ends_at,
            timezone: timezone.into(),
            ticket_tiers: Vec::new(),
            views: 0,
            interested: 0,
            attending: 0,
            is_interested: false,
            is_attending: false,
        })
    }

    /// Total tickets still available across all tiers
    pub fn total_available(&self) -> u32 {
        self.ticket_tiers.iter().map(|tier| tier.available).sum()
    }
}
