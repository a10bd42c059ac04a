//! Background trace subscriber.
//!
//! [`EventTrace`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and emits one structured tracing record per event.
//! It runs as a long-lived task and shuts down when the bus sender is
//! dropped.

use tokio::sync::broadcast;

use crate::bus::GameEvent;

/// Background service that traces every published game event.
pub struct EventTrace;

impl EventTrace {
    /// Run the trace loop.
    ///
    /// Exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(mut receiver: broadcast::Receiver<GameEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event_type = %event.event_type,
                        session_id = event.session_id,
                        call_id = event.call_id,
                        payload = %event.payload,
                        "game event"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event trace lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, trace subscriber shutting down");
                    break;
                }
            }
        }
    }
}
