//! Handler for `POST /sessions/{id}/transport` -- the host actions.
//!
//! Validation happens against the persisted session inside the
//! transport transaction, never against client-supplied state. On
//! success the appended log entries are re-published on the in-process
//! bus for live observers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use needledrop_core::transport::TransportAction;
use needledrop_core::types::DbId;
use needledrop_db::repositories::TransportRepo;
use needledrop_events::GameEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for the transport endpoint.
#[derive(Debug, Deserialize)]
pub struct TransportRequest {
    pub action: String,
    pub call_id: DbId,
}

/// Updated pointer state returned on success.
#[derive(Debug, Serialize)]
pub struct TransportResponse {
    pub current_call_index: i32,
    pub status: String,
}

/// POST /api/v1/sessions/{id}/transport
///
/// Returns 409 `ORDERING_VIOLATION` / `CONFLICTING_STATE` on rejected
/// transitions; the client re-fetches state and retries with corrected
/// intent -- the server never auto-corrects.
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransportRequest>,
) -> AppResult<Json<DataResponse<TransportResponse>>> {
    let action = TransportAction::parse(&input.action).ok_or_else(|| {
        AppError::BadRequest("action must be pull, cue, call, or skip".to_string())
    })?;

    let outcome = TransportRepo::execute(&state.pool, id, action, input.call_id, Utc::now()).await?;

    for event in &outcome.events {
        state.event_bus.publish(
            GameEvent::new(event.event_type(), id)
                .with_call(event.call_id())
                .with_payload(event.payload()),
        );
    }

    Ok(Json(DataResponse {
        data: TransportResponse {
            current_call_index: outcome.session.current_call_index,
            status: outcome.session.status,
        },
    }))
}
