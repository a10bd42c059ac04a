//! HTTP handlers, one module per resource area.

pub mod calls;
pub mod cards;
pub mod events;
pub mod lifecycle;
pub mod sessions;
pub mod transport;
