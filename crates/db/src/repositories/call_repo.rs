//! Repository for the `session_calls` table.

use needledrop_core::types::DbId;
use sqlx::PgPool;

use crate::models::call::Call;

/// Column list for `session_calls` queries.
pub(crate) const CALL_COLUMNS: &str = "id, session_id, round_number, call_index, column_letter, \
     track_title, artist_name, album_name, side, \"position\", status, \
     prep_started_at, called_at, completed_at, created_at";

/// Provides read operations for a session's call deck. All mutations go
/// through the transport transaction.
pub struct CallRepo;

impl CallRepo {
    /// List a session's calls in playback order.
    pub async fn list(pool: &PgPool, session_id: DbId) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!(
            "SELECT {CALL_COLUMNS} FROM session_calls \
             WHERE session_id = $1 ORDER BY call_index"
        );
        sqlx::query_as::<_, Call>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// List one round's calls in playback order.
    pub async fn list_round(
        pool: &PgPool,
        session_id: DbId,
        round: i32,
    ) -> Result<Vec<Call>, sqlx::Error> {
        let query = format!(
            "SELECT {CALL_COLUMNS} FROM session_calls \
             WHERE session_id = $1 AND round_number = $2 ORDER BY call_index"
        );
        sqlx::query_as::<_, Call>(&query)
            .bind(session_id)
            .bind(round)
            .fetch_all(pool)
            .await
    }

    /// Uncalled tracks left in a round (pending or cued). Exposed so the
    /// host layer can apply its pool-exhaustion policy.
    pub async fn remaining_in_round(
        pool: &PgPool,
        session_id: DbId,
        round: i32,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM session_calls \
             WHERE session_id = $1 AND round_number = $2 \
               AND status IN ('pending', 'prep_started')",
        )
        .bind(session_id)
        .bind(round)
        .fetch_one(pool)
        .await
    }
}
