//! Transport execution: applies a core [`TransportPlan`] atomically.
//!
//! One transaction per host action. The session row lock taken first is
//! the per-session serialization point: of two concurrent actions, the
//! second blocks until the first commits, then re-reads and re-validates
//! against the advanced pointer -- so it observes `OrderingViolation` or
//! `ConflictingState` instead of double-applying.

use needledrop_core::error::CoreError;
use needledrop_core::transport::{
    plan_transport, CallChange, CallSnapshot, CallStatus, SessionSnapshot, TransportAction,
    TransportEvent,
};
use needledrop_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::session::Session;
use crate::repositories::event_repo::EventRepo;
use crate::repositories::session_repo::{SessionRepo, SESSION_COLUMNS};

/// The result of an accepted transport action.
#[derive(Debug)]
pub struct TransportOutcome {
    /// The session row after the action (carries the updated pointer).
    pub session: Session,
    /// The event-log entries the action appended, in order.
    pub events: Vec<TransportEvent>,
}

/// Executes transport actions against persisted session state.
pub struct TransportRepo;

impl TransportRepo {
    pub async fn execute(
        pool: &PgPool,
        session_id: DbId,
        action: TransportAction,
        call_id: DbId,
        now: Timestamp,
    ) -> Result<TransportOutcome, DbError> {
        let mut tx = pool.begin().await?;

        let session = SessionRepo::lock(&mut tx, session_id).await?;
        let calls = load_call_snapshots(&mut tx, session_id).await?;

        let plan = plan_transport(
            action,
            &SessionSnapshot {
                current_call_index: session.current_call_index,
            },
            &calls,
            call_id,
        )?;

        for change in &plan.changes {
            apply_change(&mut tx, change, now).await?;
        }

        if let Some(index) = plan.advance_to {
            // Advancing restarts the countdown and clears any pause; the
            // first call also stamps started_at.
            sqlx::query(
                "UPDATE game_sessions SET current_call_index = $2, status = 'running', \
                    countdown_started_at = $3, paused_at = NULL, \
                    paused_remaining_seconds = NULL, \
                    started_at = COALESCE(started_at, $3) \
                 WHERE id = $1",
            )
            .bind(session_id)
            .bind(index)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        for event in &plan.events {
            EventRepo::insert_tx(&mut tx, session_id, event.event_type(), &event.payload())
                .await?;
        }

        let query = format!("SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = $1");
        let updated: Session = sqlx::query_as(&query)
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(TransportOutcome {
            session: updated,
            events: plan.events,
        })
    }
}

/// Load the minimal per-call state the planner validates against.
async fn load_call_snapshots(
    tx: &mut Transaction<'_, Postgres>,
    session_id: DbId,
) -> Result<Vec<CallSnapshot>, DbError> {
    let rows: Vec<(DbId, i32, String)> = sqlx::query_as(
        "SELECT id, call_index, status FROM session_calls \
         WHERE session_id = $1 ORDER BY call_index",
    )
    .bind(session_id)
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter()
        .map(|(id, call_index, status)| {
            let status = CallStatus::parse(&status).ok_or_else(|| {
                DbError::Core(CoreError::Internal(format!(
                    "unknown call status '{status}' on call {id}"
                )))
            })?;
            Ok(CallSnapshot {
                id,
                call_index,
                status,
            })
        })
        .collect()
}

/// Write one planned status change, stamping the matching timestamp.
async fn apply_change(
    tx: &mut Transaction<'_, Postgres>,
    change: &CallChange,
    now: Timestamp,
) -> Result<(), sqlx::Error> {
    let query = match change.status {
        CallStatus::PrepStarted => {
            "UPDATE session_calls SET status = $2, prep_started_at = $3 WHERE id = $1"
        }
        CallStatus::Called => "UPDATE session_calls SET status = $2, called_at = $3 WHERE id = $1",
        CallStatus::Completed | CallStatus::Skipped => {
            "UPDATE session_calls SET status = $2, completed_at = $3 WHERE id = $1"
        }
        // Demotion back to pending keeps its historical prep stamp.
        CallStatus::Pending => {
            return sqlx::query("UPDATE session_calls SET status = $2 WHERE id = $1")
                .bind(change.call_id)
                .bind(change.status.as_str())
                .execute(&mut **tx)
                .await
                .map(|_| ());
        }
    };
    sqlx::query(query)
        .bind(change.call_id)
        .bind(change.status.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await
        .map(|_| ())
}
