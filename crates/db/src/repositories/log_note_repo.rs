//! Repository for the `log_notes` table.

use sqlx::PgPool;
use rollcall_core::types::DbId;

use crate::models::log_note::LogNote;

/// Column list for log_notes queries.
const COLUMNS: &str = "id, log_id, user_id, note, created_at";

pub struct LogNoteRepo;

impl LogNoteRepo {
    pub async fn create(
        pool: &PgPool,
        log_id: DbId,
        user_id: DbId,
        note: &str,
    ) -> Result<LogNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO log_notes (log_id, user_id, note)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogNote>(&query)
            .bind(log_id)
            .bind(user_id)
            .bind(note)
            .fetch_one(pool)
            .await
    }

    /// Notes for the given logs, oldest first.
    pub async fn list_for_logs(
        pool: &PgPool,
        log_ids: &[DbId],
    ) -> Result<Vec<LogNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM log_notes
             WHERE log_id = ANY($1)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, LogNote>(&query)
            .bind(log_ids)
            .fetch_all(pool)
            .await
    }
}
