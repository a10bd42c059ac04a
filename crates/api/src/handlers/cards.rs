//! Handler for the hydrated card read.

use axum::extract::{Path, State};
use axum::Json;
use needledrop_core::cards::{hydrate_cells, CardCell, CardSource};
use needledrop_core::error::CoreError;
use needledrop_core::modes::LabelMode;
use needledrop_core::types::DbId;
use needledrop_db::models::call::Call;
use needledrop_db::repositories::{CallRepo, CardRepo, SessionRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A card with its grid deserialized and labels re-rendered from the
/// session's current call metadata.
#[derive(Debug, Serialize)]
pub struct HydratedCard {
    pub id: DbId,
    pub card_number: i32,
    pub has_free_space: bool,
    pub grid: Vec<CardCell>,
}

/// GET /api/v1/sessions/{id}/cards
///
/// Labels are refreshed against the call rows on every read; the
/// `call_id` identity links never change after generation.
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<HydratedCard>>>> {
    let session = SessionRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GameSession",
            id,
        })?;
    let label_mode = LabelMode::parse(&session.label_mode).ok_or_else(|| {
        AppError::InternalError(format!("unknown label mode '{}'", session.label_mode))
    })?;

    let calls = CallRepo::list(&state.pool, id).await?;
    let sources: Vec<CardSource> = calls.iter().map(Call::card_source).collect();

    let cards = CardRepo::list(&state.pool, id).await?;
    let mut hydrated = Vec::with_capacity(cards.len());
    for card in cards {
        let mut cells: Vec<CardCell> = serde_json::from_value(card.grid)
            .map_err(|e| AppError::InternalError(format!("card {} grid: {e}", card.id)))?;
        hydrate_cells(&mut cells, &sources, label_mode);
        hydrated.push(HydratedCard {
            id: card.id,
            card_number: card.card_number,
            has_free_space: card.has_free_space,
            grid: cells,
        });
    }

    Ok(Json(DataResponse { data: hydrated }))
}
