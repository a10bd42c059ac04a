//! Repository for the `session_cards` table.

use needledrop_core::types::DbId;
use sqlx::PgPool;

use crate::models::card::Card;

/// Column list for `session_cards` queries.
const CARD_COLUMNS: &str = "id, session_id, card_number, has_free_space, grid, created_at";

/// Provides read operations for a session's cards. Cards are written
/// only by the session-creation transaction.
pub struct CardRepo;

impl CardRepo {
    pub async fn list(pool: &PgPool, session_id: DbId) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM session_cards \
             WHERE session_id = $1 ORDER BY card_number"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, session_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM session_cards WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(pool)
            .await
    }
}
