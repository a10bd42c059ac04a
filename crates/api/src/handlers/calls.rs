//! Handler for the call-deck polling read.

use axum::extract::{Path, Query, State};
use axum::Json;
use needledrop_core::error::CoreError;
use needledrop_core::types::DbId;
use needledrop_db::models::call::Call;
use needledrop_db::repositories::{CallRepo, SessionRepo};

use crate::error::AppResult;
use crate::query::CallListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions/{id}/calls
///
/// The full deck in playback order (host console and jumbotron poll
/// this), optionally scoped to one round.
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<CallListParams>,
) -> AppResult<Json<DataResponse<Vec<Call>>>> {
    // Distinguish an unknown session from an empty round.
    SessionRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GameSession",
            id,
        })?;

    let calls = match params.round {
        Some(round) => CallRepo::list_round(&state.pool, id, round).await?,
        None => CallRepo::list(&state.pool, id).await?,
    };
    Ok(Json(DataResponse { data: calls }))
}
