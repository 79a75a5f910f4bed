//! Repository for the `shift_assignments` table.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use rollcall_core::types::DbId;

use crate::models::assignment::{ShiftAssignment, UpsertAssignment};

/// Column list for shift_assignments queries.
const COLUMNS: &str = "id, user_id, shift_id, work_date, shift_name, start_minutes, \
    end_minutes, flexible, mode, created_by, created_at, updated_at";

/// Provides replace-on-key writes and range reads for assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Write the assignment for `(user_id, work_date)`, replacing any prior
    /// row for that key in a single statement.
    ///
    /// The shift's name and window are copied from `shifts`. Returns `None`
    /// when the shift does not exist.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertAssignment,
    ) -> Result<Option<ShiftAssignment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO shift_assignments
                (user_id, shift_id, work_date, shift_name, start_minutes, end_minutes,
                 flexible, mode, created_by)
             SELECT $1, s.id, $3, s.name, s.start_minutes, s.end_minutes, $4, $5, $6
             FROM shifts s
             WHERE s.id = $2
             ON CONFLICT (user_id, work_date) DO UPDATE SET
                shift_id = EXCLUDED.shift_id,
                shift_name = EXCLUDED.shift_name,
                start_minutes = EXCLUDED.start_minutes,
                end_minutes = EXCLUDED.end_minutes,
                flexible = EXCLUDED.flexible,
                mode = EXCLUDED.mode,
                created_by = EXCLUDED.created_by,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShiftAssignment>(&query)
            .bind(input.user_id)
            .bind(input.shift_id)
            .bind(input.work_date)
            .bind(input.flexible)
            .bind(&input.mode)
            .bind(input.created_by)
            .fetch_optional(pool)
            .await
    }

    /// Assignments in `[start, end]`, optionally restricted to `user_ids`,
    /// ordered by date then user.
    pub async fn list_in_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
        user_ids: Option<&[DbId]>,
    ) -> Result<Vec<ShiftAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shift_assignments
             WHERE work_date BETWEEN $1 AND $2
               AND ($3::BIGINT[] IS NULL OR user_id = ANY($3))
             ORDER BY work_date ASC, user_id ASC"
        );
        sqlx::query_as::<_, ShiftAssignment>(&query)
            .bind(start)
            .bind(end)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }

    /// The assignment for one day, read on the caller's transaction.
    pub async fn find_for_day(
        conn: &mut PgConnection,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shift_assignments
             WHERE user_id = $1 AND work_date = $2"
        );
        sqlx::query_as::<_, ShiftAssignment>(&query)
            .bind(user_id)
            .bind(work_date)
            .fetch_optional(conn)
            .await
    }

    /// Clear one grid cell. Returns `true` if a row was removed.
    pub async fn delete_for_day(
        pool: &PgPool,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM shift_assignments WHERE user_id = $1 AND work_date = $2")
                .bind(user_id)
                .bind(work_date)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
