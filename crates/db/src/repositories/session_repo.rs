//! Repository for the `game_sessions` table: atomic session creation and
//! the lifecycle operations (pause/resume/complete/round advance).
//!
//! Every mutating operation locks the session row `FOR UPDATE` inside a
//! transaction and validates against the just-read row, never against
//! client-supplied state. Two concurrent writers for the same session
//! therefore serialize; the loser re-validates against fresh state and
//! surfaces a conflict instead of clobbering.

use needledrop_core::cards::{build_cards, CardSource};
use needledrop_core::deck::{column_letter, ensure_pool_size, round_number, PoolTrack};
use needledrop_core::error::CoreError;
use needledrop_core::lifecycle::{
    plan_advance_round, plan_complete, plan_pause, plan_resume, LifecycleSnapshot, RoundAdvance,
    SessionStatus,
};
use needledrop_core::types::{DbId, Timestamp};
use rand::rngs::StdRng;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::call::Call;
use crate::models::session::{CreateSession, Session, UpdateSessionConfig};
use crate::repositories::call_repo::CALL_COLUMNS;

/// Column list for `game_sessions` queries.
pub(crate) const SESSION_COLUMNS: &str = "id, playlist_id, event_name, session_code, variant, \
     call_mode, card_count, card_layout, label_mode, round_count, current_round, \
     songs_per_round, round_end_policy, tie_break_policy, pool_exhaustion_policy, \
     winner_pending, remove_resleeve_seconds, place_vinyl_seconds, cue_seconds, \
     start_slide_seconds, host_buffer_seconds, output_delay_ms, seconds_to_next_call, \
     countdown_started_at, paused_at, paused_remaining_seconds, current_call_index, \
     recent_calls_limit, show_title, show_logo, show_rounds, show_countdown, status, \
     created_at, started_at, ended_at";

/// Provides session CRUD and lifecycle operations.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions newest-first, optionally scoped to one playlist.
    pub async fn list(
        pool: &PgPool,
        playlist_id: Option<DbId>,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions \
             WHERE ($1::bigint IS NULL OR playlist_id = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(playlist_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a join code is already taken (creation retries on true).
    pub async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM game_sessions WHERE session_code = $1")
                .bind(code)
                .fetch_optional(pool)
                .await?;
        Ok(existing.is_some())
    }

    /// Patch the display configuration. Returns the updated row, or
    /// `None` if the session does not exist.
    pub async fn update_config(
        pool: &PgPool,
        id: DbId,
        patch: &UpdateSessionConfig,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE game_sessions SET \
                recent_calls_limit = COALESCE($2, recent_calls_limit), \
                show_title = COALESCE($3, show_title), \
                show_logo = COALESCE($4, show_logo), \
                show_rounds = COALESCE($5, show_rounds), \
                show_countdown = COALESCE($6, show_countdown), \
                winner_pending = COALESCE($7, winner_pending) \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(patch.recent_calls_limit)
            .bind(patch.show_title)
            .bind(patch.show_logo)
            .bind(patch.show_rounds)
            .bind(patch.show_countdown)
            .bind(patch.winner_pending)
            .fetch_optional(pool)
            .await
    }

    /// Delete a session and, by cascade, its calls, cards, and events.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM game_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a session with its full call deck and card set in one
    /// transaction.
    ///
    /// `deck` is the already-ordered call sequence (the generator ran
    /// before this call); `rng` drives card sampling. Any failure,
    /// including a pool too small to fill cards, rolls the whole
    /// creation back, so a session never exists with partial children.
    pub async fn create_with_deck(
        pool: &PgPool,
        create: &CreateSession,
        deck: &[PoolTrack],
        rng: &mut StdRng,
    ) -> Result<Session, DbError> {
        ensure_pool_size(deck.len())?;

        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO game_sessions \
                (playlist_id, event_name, session_code, variant, call_mode, card_count, \
                 card_layout, label_mode, round_count, songs_per_round, \
                 remove_resleeve_seconds, place_vinyl_seconds, cue_seconds, \
                 start_slide_seconds, host_buffer_seconds, output_delay_ms, \
                 seconds_to_next_call, recent_calls_limit, show_title, show_logo, \
                 show_rounds, show_countdown) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     $16, $17, $18, $19, $20, $21, $22) \
             RETURNING {SESSION_COLUMNS}"
        );
        let session: Session = sqlx::query_as(&insert)
            .bind(create.playlist_id)
            .bind(&create.event_name)
            .bind(&create.session_code)
            .bind(create.variant.as_str())
            .bind(create.call_mode.as_str())
            .bind(create.card_count)
            .bind(create.card_layout.as_str())
            .bind(create.label_mode.as_str())
            .bind(create.round_count)
            .bind(create.songs_per_round)
            .bind(create.remove_resleeve_seconds)
            .bind(create.place_vinyl_seconds)
            .bind(create.cue_seconds)
            .bind(create.start_slide_seconds)
            .bind(create.host_buffer_seconds)
            .bind(create.output_delay_ms)
            .bind(create.seconds_to_next_call)
            .bind(create.recent_calls_limit)
            .bind(create.show_title)
            .bind(create.show_logo)
            .bind(create.show_rounds)
            .bind(create.show_countdown)
            .fetch_one(&mut *tx)
            .await?;

        // Materialize the deck 1:1 into call rows.
        let insert_call = format!(
            r#"INSERT INTO session_calls
                (session_id, round_number, call_index, column_letter, track_title,
                 artist_name, album_name, side, "position")
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {CALL_COLUMNS}"#
        );
        let mut calls: Vec<Call> = Vec::with_capacity(deck.len());
        for (i, track) in deck.iter().enumerate() {
            let call_index = (i + 1) as i32;
            let round =
                round_number(call_index, create.songs_per_round, create.round_count);
            let call: Call = sqlx::query_as(&insert_call)
                .bind(session.id)
                .bind(round)
                .bind(call_index)
                .bind(column_letter(call_index).to_string())
                .bind(&track.title)
                .bind(&track.artist)
                .bind(&track.album)
                .bind(&track.side)
                .bind(&track.position)
                .fetch_one(&mut *tx)
                .await?;
            calls.push(call);
        }

        let sources: Vec<CardSource> = calls.iter().map(Call::card_source).collect();
        let grids = build_cards(
            &sources,
            create.card_count,
            create.variant,
            create.label_mode,
            rng,
        )?;

        let has_free_space = create.variant.has_free_space();
        for (n, grid) in grids.iter().enumerate() {
            let grid_json = serde_json::to_value(grid)
                .map_err(|e| CoreError::Internal(format!("card grid serialization: {e}")))?;
            sqlx::query(
                "INSERT INTO session_cards (session_id, card_number, has_free_space, grid) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(session.id)
            .bind((n + 1) as i32)
            .bind(has_free_space)
            .bind(grid_json)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            session_id = session.id,
            calls = deck.len(),
            cards = grids.len(),
            "Session created with deck and cards"
        );
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Freeze the countdown, snapshotting remaining seconds for an exact
    /// resume.
    pub async fn pause(pool: &PgPool, id: DbId, now: Timestamp) -> Result<Session, DbError> {
        let mut tx = pool.begin().await?;
        let session = Self::lock(&mut tx, id).await?;
        let plan = plan_pause(&snapshot(&session)?, now)?;

        let query = format!(
            "UPDATE game_sessions SET status = 'paused', paused_at = $2, \
                paused_remaining_seconds = $3 \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        );
        let updated: Session = sqlx::query_as(&query)
            .bind(id)
            .bind(plan.paused_at)
            .bind(plan.paused_remaining_seconds)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Unfreeze the countdown with the exact remaining time restored.
    pub async fn resume(pool: &PgPool, id: DbId, now: Timestamp) -> Result<Session, DbError> {
        let mut tx = pool.begin().await?;
        let session = Self::lock(&mut tx, id).await?;
        let plan = plan_resume(&snapshot(&session)?, now)?;

        let query = format!(
            "UPDATE game_sessions SET status = 'running', countdown_started_at = $2, \
                paused_at = NULL, paused_remaining_seconds = NULL \
             WHERE id = $1 RETURNING {SESSION_COLUMNS}"
        );
        let updated: Session = sqlx::query_as(&query)
            .bind(id)
            .bind(plan.countdown_started_at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Explicit host completion (terminal).
    pub async fn complete(pool: &PgPool, id: DbId, now: Timestamp) -> Result<Session, DbError> {
        let mut tx = pool.begin().await?;
        let session = Self::lock(&mut tx, id).await?;
        plan_complete(&snapshot(&session)?)?;

        let updated = complete_in_tx(&mut tx, id, now).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Consume an external scoring confirmation: advance to the next
    /// round, or complete the session when the final round is confirmed.
    pub async fn advance_round(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Session, DbError> {
        let mut tx = pool.begin().await?;
        let session = Self::lock(&mut tx, id).await?;
        let snap = snapshot(&session)?;

        let next_first: Option<i32> = sqlx::query_scalar(
            "SELECT MIN(call_index) FROM session_calls \
             WHERE session_id = $1 AND round_number = $2",
        )
        .bind(id)
        .bind(session.current_round + 1)
        .fetch_one(&mut *tx)
        .await?;

        let updated = match plan_advance_round(&snap, next_first)? {
            RoundAdvance::Completed => complete_in_tx(&mut tx, id, now).await?,
            RoundAdvance::NextRound {
                round,
                call_pointer,
            } => {
                // A paused session comes back running for the new round.
                let status = match snap.status {
                    SessionStatus::Paused => SessionStatus::Running,
                    other => other,
                };
                let query = format!(
                    "UPDATE game_sessions SET current_round = $2, \
                        current_call_index = COALESCE($3, current_call_index), \
                        winner_pending = false, status = $4, \
                        countdown_started_at = NULL, paused_at = NULL, \
                        paused_remaining_seconds = NULL \
                     WHERE id = $1 RETURNING {SESSION_COLUMNS}"
                );
                sqlx::query_as::<_, Session>(&query)
                    .bind(id)
                    .bind(round)
                    .bind(call_pointer)
                    .bind(status.as_str())
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;
        Ok(updated)
    }

    /// Lock a session row for the duration of the surrounding
    /// transaction. This is the per-session serialization point for
    /// every mutating operation.
    pub(crate) async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Session, DbError> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = $1 FOR UPDATE");
        let session: Option<Session> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        session.ok_or(DbError::Core(CoreError::NotFound {
            entity: "GameSession",
            id,
        }))
    }
}

/// Parse the lifecycle-relevant slice of a session row.
fn snapshot(session: &Session) -> Result<LifecycleSnapshot, DbError> {
    let status = SessionStatus::parse(&session.status).ok_or_else(|| {
        CoreError::Internal(format!("unknown session status '{}'", session.status))
    })?;
    Ok(LifecycleSnapshot {
        status,
        current_round: session.current_round,
        round_count: session.round_count,
        seconds_to_next_call: session.seconds_to_next_call,
        countdown_started_at: session.countdown_started_at,
        paused_at: session.paused_at,
        paused_remaining_seconds: session.paused_remaining_seconds,
    })
}

async fn complete_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
    now: Timestamp,
) -> Result<Session, sqlx::Error> {
    let query = format!(
        "UPDATE game_sessions SET status = 'completed', ended_at = $2, \
            winner_pending = false, paused_at = NULL, paused_remaining_seconds = NULL \
         WHERE id = $1 RETURNING {SESSION_COLUMNS}"
    );
    sqlx::query_as(&query)
        .bind(id)
        .bind(now)
        .fetch_one(&mut **tx)
        .await
}
