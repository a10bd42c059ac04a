//! Handlers for the `/sessions` resource.
//!
//! Session creation runs the whole generation pipeline: resolve the
//! playlist pool, order the call deck, draw a unique join code, and
//! persist session + calls + cards in one transaction. Everything after
//! creation is reads plus the narrow display-config patch; live state
//! moves only through the transport and lifecycle handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use needledrop_core::deck::{build_call_order, ensure_pool_size, songs_per_round, PoolTrack};
use needledrop_core::error::CoreError;
use needledrop_core::modes::{CallMode, CardLayout, GameVariant, LabelMode};
use needledrop_core::pacing::{remaining_seconds, PacingBudgets};
use needledrop_core::session_code::{generate_session_code, MAX_CODE_ATTEMPTS};
use needledrop_core::types::DbId;
use needledrop_db::models::session::{CreateSession, Session, UpdateSessionConfig};
use needledrop_db::repositories::{CallRepo, PlaylistRepo, SessionRepo};
use needledrop_db::DbPool;
use needledrop_events::GameEvent;

use crate::error::{AppError, AppResult};
use crate::query::SessionListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /api/v1/sessions`. Omitted fields take the house
/// defaults; `seed` pins deck and card generation for reproducible
/// sessions (tests, card reprints).
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub playlist_id: DbId,
    pub event_name: Option<String>,
    pub variant: Option<GameVariant>,
    pub call_mode: Option<CallMode>,
    pub card_count: Option<i32>,
    pub card_layout: Option<CardLayout>,
    pub label_mode: Option<LabelMode>,
    pub round_count: Option<i32>,
    pub remove_resleeve_seconds: Option<i32>,
    pub place_vinyl_seconds: Option<i32>,
    pub cue_seconds: Option<i32>,
    pub start_slide_seconds: Option<i32>,
    pub host_buffer_seconds: Option<i32>,
    pub output_delay_ms: Option<i32>,
    pub recent_calls_limit: Option<i32>,
    pub show_title: Option<bool>,
    pub show_logo: Option<bool>,
    pub show_rounds: Option<bool>,
    pub show_countdown: Option<bool>,
    pub seed: Option<u64>,
}

/// Response payload for a created session.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: DbId,
    pub session_code: String,
}

/// POST /api/v1/sessions
///
/// Create a session with its full call deck and card set. Fails with
/// 400 `INSUFFICIENT_POOL` before anything is persisted if the playlist
/// cannot fill the cards; any later failure rolls the creation back.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SessionCreated>>)> {
    validate_create(&input)?;

    let playlist = PlaylistRepo::get(&state.pool, input.playlist_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Playlist",
            id: input.playlist_id,
        })?;

    let tracks = PlaylistRepo::list_tracks(&state.pool, playlist.id).await?;
    if tracks.is_empty() {
        return Err(AppError::Core(CoreError::PoolNotFound {
            playlist_id: playlist.id,
        }));
    }
    let pool_tracks: Vec<PoolTrack> = tracks.into_iter().map(|t| t.into_pool_track()).collect();
    ensure_pool_size(pool_tracks.len())?;

    // Each session gets its own RNG so sessions stay independently
    // unpredictable; a pinned seed reproduces deck and cards exactly.
    let mut rng = match input.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let call_mode = input.call_mode.unwrap_or(CallMode::Random);
    let deck = build_call_order(pool_tracks, call_mode, &mut rng);

    let session_code = unique_code(&state.pool, &mut rng).await?;

    let defaults = PacingBudgets::default();
    let budgets = PacingBudgets {
        remove_resleeve_seconds: input
            .remove_resleeve_seconds
            .unwrap_or(defaults.remove_resleeve_seconds),
        place_vinyl_seconds: input
            .place_vinyl_seconds
            .unwrap_or(defaults.place_vinyl_seconds),
        cue_seconds: input.cue_seconds.unwrap_or(defaults.cue_seconds),
        start_slide_seconds: input
            .start_slide_seconds
            .unwrap_or(defaults.start_slide_seconds),
        host_buffer_seconds: input
            .host_buffer_seconds
            .unwrap_or(defaults.host_buffer_seconds),
        output_delay_ms: input.output_delay_ms.unwrap_or(defaults.output_delay_ms),
    };
    let round_count = input.round_count.unwrap_or(3);

    let create = CreateSession {
        playlist_id: playlist.id,
        event_name: input.event_name.clone(),
        session_code,
        variant: input.variant.unwrap_or(GameVariant::SingleLine),
        call_mode,
        card_count: input.card_count.unwrap_or(40),
        card_layout: input.card_layout.unwrap_or(CardLayout::TwoUp),
        label_mode: input.label_mode.unwrap_or(LabelMode::TrackArtist),
        round_count,
        songs_per_round: songs_per_round(deck.len(), round_count),
        remove_resleeve_seconds: budgets.remove_resleeve_seconds,
        place_vinyl_seconds: budgets.place_vinyl_seconds,
        cue_seconds: budgets.cue_seconds,
        start_slide_seconds: budgets.start_slide_seconds,
        host_buffer_seconds: budgets.host_buffer_seconds,
        output_delay_ms: budgets.output_delay_ms,
        seconds_to_next_call: budgets.seconds_to_next_call(),
        recent_calls_limit: input.recent_calls_limit.unwrap_or(5),
        show_title: input.show_title.unwrap_or(true),
        show_logo: input.show_logo.unwrap_or(true),
        show_rounds: input.show_rounds.unwrap_or(true),
        show_countdown: input.show_countdown.unwrap_or(true),
    };

    let session = SessionRepo::create_with_deck(&state.pool, &create, &deck, &mut rng).await?;

    state.event_bus.publish(
        GameEvent::new("session_created", session.id).with_payload(serde_json::json!({
            "session_code": session.session_code,
            "call_count": deck.len(),
        })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionCreated {
                id: session.id,
                session_code: session.session_code,
            },
        }),
    ))
}

/// GET /api/v1/sessions
///
/// List sessions newest-first, optionally filtered by playlist.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SessionListParams>,
) -> AppResult<Json<DataResponse<Vec<Session>>>> {
    let sessions = SessionRepo::list(&state.pool, params.playlist_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// Session detail as served to polling clients: the row plus the fields
/// clients would otherwise have to derive.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub playlist_name: String,
    /// Countdown seconds left, computed server-side at read time.
    pub remaining_seconds: i32,
    /// Uncalled tracks left in the current round (for the host layer's
    /// pool-exhaustion policy).
    pub remaining_in_round: i64,
}

/// GET /api/v1/sessions/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionDetail>>> {
    let session = SessionRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GameSession",
            id,
        })?;

    let playlist_name = PlaylistRepo::get(&state.pool, session.playlist_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_else(|| "Unknown Playlist".to_string());

    let remaining = remaining_seconds(
        session.seconds_to_next_call,
        session.countdown_started_at,
        session.paused_at,
        session.paused_remaining_seconds,
        Utc::now(),
    );
    let remaining_in_round =
        CallRepo::remaining_in_round(&state.pool, session.id, session.current_round).await?;

    Ok(Json(DataResponse {
        data: SessionDetail {
            playlist_name,
            remaining_seconds: remaining,
            remaining_in_round,
            session,
        },
    }))
}

/// Body for `PATCH /api/v1/sessions/{id}` -- display configuration only.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub recent_calls_limit: Option<i32>,
    pub show_title: Option<bool>,
    pub show_logo: Option<bool>,
    pub show_rounds: Option<bool>,
    pub show_countdown: Option<bool>,
    pub winner_pending: Option<bool>,
}

/// PATCH /api/v1/sessions/{id}
pub async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSessionRequest>,
) -> AppResult<Json<DataResponse<Session>>> {
    if let Some(limit) = input.recent_calls_limit {
        if !(1..=20).contains(&limit) {
            return Err(AppError::Core(CoreError::Validation(
                "recent_calls_limit must be between 1 and 20".to_string(),
            )));
        }
    }

    let patch = UpdateSessionConfig {
        recent_calls_limit: input.recent_calls_limit,
        show_title: input.show_title,
        show_logo: input.show_logo,
        show_rounds: input.show_rounds,
        show_countdown: input.show_countdown,
        winner_pending: input.winner_pending,
    };
    let session = SessionRepo::update_config(&state.pool, id, &patch)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "GameSession",
            id,
        })?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Cascade-deletes the session with its calls, cards, and events. Admin
/// cleanup only; live clients never delete mid-event.
pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SessionRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "GameSession",
            id,
        }))
    }
}

// ── Private helpers ──────────────────────────────────────────────────────

fn validate_create(input: &CreateSessionRequest) -> AppResult<()> {
    if let Some(count) = input.card_count {
        if !(1..=200).contains(&count) {
            return Err(validation("card_count must be between 1 and 200"));
        }
    }
    if let Some(rounds) = input.round_count {
        if !(1..=10).contains(&rounds) {
            return Err(validation("round_count must be between 1 and 10"));
        }
    }
    if let Some(limit) = input.recent_calls_limit {
        if !(1..=20).contains(&limit) {
            return Err(validation("recent_calls_limit must be between 1 and 20"));
        }
    }
    for (name, value) in [
        ("remove_resleeve_seconds", input.remove_resleeve_seconds),
        ("place_vinyl_seconds", input.place_vinyl_seconds),
        ("cue_seconds", input.cue_seconds),
        ("start_slide_seconds", input.start_slide_seconds),
        ("host_buffer_seconds", input.host_buffer_seconds),
        ("output_delay_ms", input.output_delay_ms),
    ] {
        if value.is_some_and(|v| v < 0) {
            return Err(validation(&format!("{name} must not be negative")));
        }
    }
    Ok(())
}

fn validation(msg: &str) -> AppError {
    AppError::Core(CoreError::Validation(msg.to_string()))
}

/// Draw join codes until one is free. The unique constraint still backs
/// this up if two creations race on the same code.
async fn unique_code(pool: &DbPool, rng: &mut StdRng) -> AppResult<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_session_code(rng);
        if !SessionRepo::code_exists(pool, &code).await? {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "unable to generate a unique session code".to_string(),
    ))
}
