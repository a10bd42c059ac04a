//! Needledrop event bus infrastructure.
//!
//! Live fan-out for game events:
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`GameEvent`] -- the canonical event envelope.
//! - [`EventTrace`] -- background subscriber emitting structured tracing
//!   for every published event.
//!
//! The durable transport log is written transactionally by the
//! persistence layer; this bus exists for live observers and keeps the
//! engine push-agnostic (a streaming notification surface can subscribe
//! here later without touching any core invariant).

pub mod bus;
pub mod trace;

pub use bus::{EventBus, GameEvent};
pub use trace::EventTrace;
