//! Quote lifecycle event bus
//!
//! A typed broadcast channel carrying quote lifecycle events. Publishers are
//! the quote and portal routes; subscribers are the notification recorder
//! and the SSE stream. This replaces ambient cross-component signalling with
//! an explicit, inspectable channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Quote lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuoteEvent {
    /// Totals were computed and persisted
    Calculated {
        quote_id: Uuid,
        company_id: Uuid,
        customer_name: String,
        total_cents: i64,
    },
    /// The quote was sent to the customer
    Sent {
        quote_id: Uuid,
        company_id: Uuid,
        customer_name: String,
    },
    /// The customer opened the portal link
    Viewed {
        quote_id: Uuid,
        company_id: Uuid,
        customer_name: String,
    },
    /// The customer accepted
    Accepted {
        quote_id: Uuid,
        company_id: Uuid,
        customer_name: String,
        total_cents: i64,
    },
    /// The customer declined
    Declined {
        quote_id: Uuid,
        company_id: Uuid,
        customer_name: String,
    },
}

impl QuoteEvent {
    pub fn company_id(&self) -> Uuid {
        match self {
            Self::Calculated { company_id, .. }
            | Self::Sent { company_id, .. }
            | Self::Viewed { company_id, .. }
            | Self::Accepted { company_id, .. }
            | Self::Declined { company_id, .. } => *company_id,
        }
    }

    pub fn quote_id(&self) -> Uuid {
        match self {
            Self::Calculated { quote_id, .. }
            | Self::Sent { quote_id, .. }
            | Self::Viewed { quote_id, .. }
            | Self::Accepted { quote_id, .. }
            | Self::Declined { quote_id, .. } => *quote_id,
        }
    }
}

/// Broadcast bus for quote events
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QuoteEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: QuoteEvent) {
        tracing::debug!(quote_id = %event.quote_id(), "Publishing quote event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuoteEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        let quote_id = Uuid::new_v4();
        bus.publish(QuoteEvent::Sent {
            quote_id,
            company_id: Uuid::new_v4(),
            customer_name: "Dana Whitfield".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.quote_id(), quote_id);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::new(8);
        bus.publish(QuoteEvent::Declined {
            quote_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            customer_name: "Dana Whitfield".to_string(),
        });
    }
}
