//! In-process event bus for tenant-scoped realtime notifications.
//!
//! - [`EventBus`] — publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical event envelope; every event carries the
//!   organization it belongs to.
//! - [`Subscription`] — unsubscribe token returned by
//!   [`EventBus::subscribe_org`], decoupling feed teardown from any
//!   connection or view lifetime.

pub mod bus;

pub use bus::{DomainEvent, EventBus, Subscription, EVENT_VOTER_REGISTERED};
