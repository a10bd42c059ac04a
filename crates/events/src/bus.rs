//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`GameEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use needledrop_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// GameEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred during a live session.
///
/// Constructed via [`GameEvent::new`] and enriched with
/// [`with_call`](GameEvent::with_call) and
/// [`with_payload`](GameEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    /// Event name matching the durable log's `event_type` (e.g.
    /// `"call_set"`, `"session_paused"`).
    pub event_type: String,

    /// The session the event belongs to.
    pub session_id: DbId,

    /// The call involved, when the event targets one.
    pub call_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    /// Create a new event for a session.
    pub fn new(event_type: impl Into<String>, session_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            session_id,
            call_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the targeted call.
    pub fn with_call(mut self, call_id: DbId) -> Self {
        self.call_id = Some(call_id);
        self
    }

    /// Set the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`GameEvent`].
pub struct EventBus {
    sender: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no active subscribers the event is silently dropped; the
    /// durable log was already written inside the owning transaction.
    pub fn publish(&self, event: GameEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
