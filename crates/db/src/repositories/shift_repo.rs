//! Repository for the `shifts` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use rollcall_core::types::DbId;

use crate::models::shift::{CreateShift, Shift, UpdateShift};

/// Column list for shifts queries.
const COLUMNS: &str = "id, name, kind, start_minutes, end_minutes, departments, color, \
    created_by, created_at, updated_at";

/// Outcome of a guarded shift delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDeletion {
    Deleted,
    NotFound,
    /// Assignments on or after the cutoff date still reference the shift.
    InUse,
}

/// Provides CRUD operations for shift templates.
pub struct ShiftRepo;

impl ShiftRepo {
    /// Insert a new shift, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateShift) -> Result<Shift, sqlx::Error> {
        let query = format!(
            "INSERT INTO shifts (name, kind, start_minutes, end_minutes, departments, color, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.start_minutes)
            .bind(input.end_minutes)
            .bind(&input.departments)
            .bind(&input.color)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shifts WHERE id = $1");
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all shifts ordered by start time, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Shift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shifts ORDER BY start_minutes ASC, name ASC");
        sqlx::query_as::<_, Shift>(&query).fetch_all(pool).await
    }

    /// Patch a shift. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShift,
    ) -> Result<Option<Shift>, sqlx::Error> {
        let query = format!(
            "UPDATE shifts SET
                name = COALESCE($2, name),
                kind = COALESCE($3, kind),
                start_minutes = COALESCE($4, start_minutes),
                end_minutes = COALESCE($5, end_minutes),
                departments = COALESCE($6, departments),
                color = COALESCE($7, color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shift>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.start_minutes)
            .bind(input.end_minutes)
            .bind(&input.departments)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a shift unless an assignment dated `from` or later uses it.
    ///
    /// Older assignments keep their snapshot; their `shift_id` is nulled by
    /// the foreign key.
    pub async fn delete_unless_scheduled(
        pool: &PgPool,
        id: DbId,
        from: NaiveDate,
    ) -> Result<ShiftDeletion, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM shifts
             WHERE id = $1
               AND NOT EXISTS (
                   SELECT 1 FROM shift_assignments
                   WHERE shift_id = $1 AND work_date >= $2
               )",
        )
        .bind(id)
        .bind(from)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(ShiftDeletion::Deleted);
        }
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM shifts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(if exists {
            ShiftDeletion::InUse
        } else {
            ShiftDeletion::NotFound
        })
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM shifts WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
