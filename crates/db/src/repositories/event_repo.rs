//! Repository for the `session_events` table (append-only transport log).

use needledrop_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event::SessionEvent;

/// Column list for `session_events` queries.
const EVENT_COLUMNS: &str = "id, session_id, event_type, payload, created_at";

/// Default and maximum page sizes for log reads.
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Clamp a client-supplied limit to a sane page size.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Provides append/read operations for the transport event log.
pub struct EventRepo;

impl EventRepo {
    /// Append one event row inside an open transaction.
    ///
    /// Transport transitions call this so the log lands atomically with
    /// the status changes it records.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        session_id: DbId,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO session_events (session_id, event_type, payload) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(session_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&mut **tx)
        .await
    }

    /// List a session's events newest-first.
    pub async fn list_recent(
        pool: &PgPool,
        session_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<SessionEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM session_events \
             WHERE session_id = $1 ORDER BY id DESC LIMIT $2"
        );
        sqlx::query_as::<_, SessionEvent>(&query)
            .bind(session_id)
            .bind(clamp_limit(limit))
            .fetch_all(pool)
            .await
    }
}
