//! Tenant-scoped event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application. The
//! dashboard realtime feed consumes it through [`EventBus::subscribe_org`],
//! which filters to a single organization and hands back a [`Subscription`]
//! token; dropping (or explicitly unsubscribing) the token tears the
//! forwarding task down so a closed connection never leaks a subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use electo_core::types::DbId;

/// Event published when a dirigente registers a mobilized voter.
pub const EVENT_VOTER_REGISTERED: &str = "voter.registered";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A domain event scoped to one organization.
///
/// Constructed via [`DomainEvent::new`] and enriched with the builder
/// methods [`with_entity`](DomainEvent::with_entity),
/// [`with_actor`](DomainEvent::with_actor), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"voter.registered"`.
    pub event_type: String,

    /// Tenant the event belongs to. Subscribers never observe events from
    /// another organization.
    pub organization_id: DbId,

    /// Optional id of the entity the event is about.
    pub entity_id: Option<DbId>,

    /// Optional id of the profile that triggered the event.
    pub actor_profile_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event for the given organization.
    pub fn new(event_type: impl Into<String>, organization_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            organization_id,
            entity_id: None,
            actor_profile_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the subject entity to the event.
    pub fn with_entity(mut self, entity_id: DbId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach the acting profile to the event.
    pub fn with_actor(mut self, profile_id: DbId) -> Self {
        self.actor_profile_id = Some(profile_id);
        self
    }

    /// Set the JSON payload for the event.
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
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to the raw firehose of every published event.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to events of a single organization.
    ///
    /// Spawns a filtering task that forwards matching events into the
    /// returned channel. The [`Subscription`] token owns that task: call
    /// [`Subscription::unsubscribe`] (or drop the token) to stop delivery.
    /// The channel also closes when the bus itself is dropped.
    pub fn subscribe_org(
        &self,
        organization_id: DbId,
    ) -> (Subscription, mpsc::UnboundedReceiver<DomainEvent>) {
        let mut source = self.sender.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(event) => {
                        if event.organization_id != organization_id {
                            continue;
                        }
                        if tx.send(event).is_err() {
                            // Receiver dropped; nothing left to deliver to.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, organization_id, "Event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        (Subscription { handle }, rx)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Token tying an organization-scoped subscription to its forwarding task.
///
/// Dropping the token aborts the task, so subscriptions cannot outlive the
/// consumer that created them.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Explicitly stop delivery.
    pub fn unsubscribe(self) {
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
