//! Handler for the transport-log read.

use axum::extract::{Path, Query, State};
use axum::Json;
use needledrop_core::error::CoreError;
use needledrop_core::types::DbId;
use needledrop_db::models::event::SessionEvent;
use needledrop_db::repositories::{EventRepo, SessionRepo};

use crate::error::AppResult;
use crate::query::EventListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions/{id}/events
///
/// The session's transport log newest-first (host history view and
/// post-event reporting).
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<Vec<SessionEvent>>>> {
    SessionRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GameSession",
            id,
        })?;

    let events = EventRepo::list_recent(&state.pool, id, params.limit).await?;
    Ok(Json(DataResponse { data: events }))
}
