//! Lifecycle handlers: pause, resume, complete, round advance.
//!
//! Each action runs under the session row lock and rejects transitions
//! that do not fit the current status with 409 `CONFLICTING_STATE`.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use needledrop_core::types::DbId;
use needledrop_db::models::session::Session;
use needledrop_db::repositories::SessionRepo;
use needledrop_events::GameEvent;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sessions/{id}/pause
pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = SessionRepo::pause(&state.pool, id, Utc::now()).await?;
    state.event_bus.publish(
        GameEvent::new("session_paused", id).with_payload(serde_json::json!({
            "paused_remaining_seconds": session.paused_remaining_seconds,
        })),
    );
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/resume
pub async fn resume(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = SessionRepo::resume(&state.pool, id, Utc::now()).await?;
    state
        .event_bus
        .publish(GameEvent::new("session_resumed", id));
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = SessionRepo::complete(&state.pool, id, Utc::now()).await?;
    state
        .event_bus
        .publish(GameEvent::new("session_completed", id));
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/advance-round
///
/// Consumes the host layer's scoring confirmation. Advancing past the
/// final round completes the session.
pub async fn advance_round(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = SessionRepo::advance_round(&state.pool, id, Utc::now()).await?;
    state.event_bus.publish(
        GameEvent::new("round_advanced", id).with_payload(serde_json::json!({
            "current_round": session.current_round,
            "status": session.status,
        })),
    );
    Ok(Json(DataResponse { data: session }))
}
