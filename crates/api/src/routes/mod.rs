pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                          list, create
/// /sessions/{id}                     get, patch (display config), delete
/// /sessions/{id}/transport           host actions (pull/cue/call/skip)
/// /sessions/{id}/pause               freeze the countdown
/// /sessions/{id}/resume              resume with exact remaining time
/// /sessions/{id}/complete            explicit host completion
/// /sessions/{id}/advance-round       consume a scoring confirmation
/// /sessions/{id}/calls               deck polling read (?round=)
/// /sessions/{id}/cards               hydrated cards
/// /sessions/{id}/events              transport log (?limit=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(sessions::router())
}
