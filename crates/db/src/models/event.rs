//! Event-log entity model.

use needledrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `session_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionEvent {
    pub id: DbId,
    pub session_id: DbId,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
