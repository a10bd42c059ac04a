//! Call entity models and DTOs.

use needledrop_core::cards::CardSource;
use needledrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `session_calls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Call {
    pub id: DbId,
    pub session_id: DbId,
    pub round_number: i32,
    pub call_index: i32,
    pub column_letter: String,
    pub track_title: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub side: Option<String>,
    pub position: Option<String>,
    pub status: String,
    pub prep_started_at: Option<Timestamp>,
    pub called_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Call {
    /// Project the row into the card generator's source shape.
    pub fn card_source(&self) -> CardSource {
        CardSource {
            call_id: self.id,
            column_letter: self.column_letter.chars().next().unwrap_or('B'),
            track_title: self.track_title.clone(),
            artist_name: self.artist_name.clone(),
        }
    }
}

/// DTO for materializing one deck entry into a call row.
#[derive(Debug, Clone)]
pub struct NewCall {
    pub round_number: i32,
    pub call_index: i32,
    pub column_letter: char,
    pub track_title: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub side: Option<String>,
    pub position: Option<String>,
}
