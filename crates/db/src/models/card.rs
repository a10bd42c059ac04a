//! Card entity model.

use needledrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `session_cards` table. `grid` holds the ordered,
/// row-major cell list (see `needledrop_core::cards::CardCell`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub session_id: DbId,
    pub card_number: i32,
    pub has_free_space: bool,
    pub grid: serde_json::Value,
    pub created_at: Timestamp,
}
