//! Store events: push-based change notification
//!
//! Consumers subscribe to hear about changes instead of polling derived
//! state. Publication is fire-and-forget: with no subscribers an event
//! costs one failed send. Events carry identifiers, not state; a
//! subscriber that wants the new state queries the store for it.

use dealdocs_types::{ActionType, DocumentId, EmailAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

// ── Store Event ──────────────────────────────────────────────────────

/// A change published by the workflow store after a successful command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A document entered the store
    DocumentAdded { document_id: DocumentId },
    /// An action was appended to a document's history
    ActionRecorded {
        document_id: DocumentId,
        action: ActionType,
        performed_by: EmailAddress,
    },
    /// Requirements or assignments were replaced
    ConfigChanged { document_id: DocumentId },
    /// A document was tombstoned
    DocumentRemoved { document_id: DocumentId },
    /// A tombstoned document came back
    DocumentRestored { document_id: DocumentId },
}

impl StoreEvent {
    /// The document this event concerns
    pub fn document_id(&self) -> &DocumentId {
        match self {
            StoreEvent::DocumentAdded { document_id }
            | StoreEvent::ActionRecorded { document_id, .. }
            | StoreEvent::ConfigChanged { document_id }
            | StoreEvent::DocumentRemoved { document_id }
            | StoreEvent::DocumentRestored { document_id } => document_id,
        }
    }

    /// Variant name, for counters and logging
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::DocumentAdded { .. } => "DocumentAdded",
            StoreEvent::ActionRecorded { .. } => "ActionRecorded",
            StoreEvent::ConfigChanged { .. } => "ConfigChanged",
            StoreEvent::DocumentRemoved { .. } => "DocumentRemoved",
            StoreEvent::DocumentRestored { .. } => "DocumentRestored",
        }
    }
}

// ── Event Bus ────────────────────────────────────────────────────────

/// Broadcast bus for store events
pub struct EventBus {
    /// Broadcast channel for real-time distribution
    sender: broadcast::Sender<StoreEvent>,
    /// Event counters by kind
    event_counts: HashMap<String, u64>,
    /// Total events published
    events_published: u64,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self {
            sender,
            event_counts: HashMap::new(),
            events_published: 0,
        }
    }

    /// Publish an event
    pub fn publish(&mut self, event: StoreEvent) {
        *self
            .event_counts
            .entry(event.kind().to_string())
            .or_insert(0) += 1;
        self.events_published += 1;

        // Broadcast (ignore errors if no receivers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events (returns a receiver)
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published since creation
    pub fn events_published(&self) -> u64 {
        self.events_published
    }

    /// Event counters by kind
    pub fn event_counts(&self) -> &HashMap<String, u64> {
        &self.event_counts
    }

    /// Get statistics
    pub fn stats(&self) -> EventBusStats {
        EventBusStats {
            events_published: self.events_published,
            subscriber_count: self.sender.receiver_count(),
            events_by_kind: self.event_counts.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events_published", &self.events_published)
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

/// Event bus statistics
#[derive(Clone, Debug)]
pub struct EventBusStats {
    /// Total events published
    pub events_published: u64,
    /// Number of active subscribers
    pub subscriber_count: usize,
    /// Events by kind
    pub events_by_kind: HashMap<String, u64>,
}
