//! Session entity models and DTOs.

use needledrop_core::modes::{CallMode, CardLayout, GameVariant, LabelMode};
use needledrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `game_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub playlist_id: DbId,
    pub event_name: Option<String>,
    pub session_code: String,
    pub variant: String,
    pub call_mode: String,
    pub card_count: i32,
    pub card_layout: String,
    pub label_mode: String,

    pub round_count: i32,
    pub current_round: i32,
    pub songs_per_round: i32,
    pub round_end_policy: String,
    pub tie_break_policy: String,
    pub pool_exhaustion_policy: String,
    pub winner_pending: bool,

    pub remove_resleeve_seconds: i32,
    pub place_vinyl_seconds: i32,
    pub cue_seconds: i32,
    pub start_slide_seconds: i32,
    pub host_buffer_seconds: i32,
    pub output_delay_ms: i32,
    pub seconds_to_next_call: i32,
    pub countdown_started_at: Option<Timestamp>,
    pub paused_at: Option<Timestamp>,
    pub paused_remaining_seconds: Option<i32>,

    pub current_call_index: i32,
    pub recent_calls_limit: i32,
    pub show_title: bool,
    pub show_logo: bool,
    pub show_rounds: bool,
    pub show_countdown: bool,

    pub status: String,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

/// DTO for inserting a new session row.
///
/// All derived values (join code, songs-per-round split, pacing total)
/// are computed by the caller before the creation transaction opens.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub playlist_id: DbId,
    pub event_name: Option<String>,
    pub session_code: String,
    pub variant: GameVariant,
    pub call_mode: CallMode,
    pub card_count: i32,
    pub card_layout: CardLayout,
    pub label_mode: LabelMode,
    pub round_count: i32,
    pub songs_per_round: i32,
    pub remove_resleeve_seconds: i32,
    pub place_vinyl_seconds: i32,
    pub cue_seconds: i32,
    pub start_slide_seconds: i32,
    pub host_buffer_seconds: i32,
    pub output_delay_ms: i32,
    pub seconds_to_next_call: i32,
    pub recent_calls_limit: i32,
    pub show_title: bool,
    pub show_logo: bool,
    pub show_rounds: bool,
    pub show_countdown: bool,
}

/// Patch DTO for the display-configuration update path.
///
/// `None` fields are left untouched. The live pointers are deliberately
/// absent: they only move inside the transport/lifecycle transactions.
#[derive(Debug, Clone, Default)]
pub struct UpdateSessionConfig {
    pub recent_calls_limit: Option<i32>,
    pub show_title: Option<bool>,
    pub show_logo: Option<bool>,
    pub show_rounds: Option<bool>,
    pub show_countdown: Option<bool>,
    pub winner_pending: Option<bool>,
}
