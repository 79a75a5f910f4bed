//! Repository for the `attendance_forms` table.

use sqlx::PgPool;
use rollcall_core::device::REQUEST_PENDING;
use rollcall_core::types::DbId;

use crate::models::attendance_form::{AttendanceForm, CreateAttendanceForm};

/// Column list for attendance_forms queries.
const COLUMNS: &str = "id, user_id, form_type, reason, start_date, end_date, status, \
    reviewer_id, review_note, reviewed_at, created_at, updated_at";

/// Provides the leave-request workflow's persistence.
pub struct AttendanceFormRepo;

impl AttendanceFormRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttendanceForm,
    ) -> Result<AttendanceForm, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_forms (user_id, form_type, reason, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceForm>(&query)
            .bind(input.user_id)
            .bind(&input.form_type)
            .bind(&input.reason)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttendanceForm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance_forms WHERE id = $1");
        sqlx::query_as::<_, AttendanceForm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Forms newest first, optionally filtered by users and status.
    pub async fn list(
        pool: &PgPool,
        user_ids: Option<&[DbId]>,
        status: Option<&str>,
    ) -> Result<Vec<AttendanceForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_forms
             WHERE ($1::BIGINT[] IS NULL OR user_id = ANY($1))
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AttendanceForm>(&query)
            .bind(user_ids)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Decide a pending form. Returns `None` if it is missing or no longer
    /// pending.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        status: &str,
        reviewer_id: DbId,
        note: Option<&str>,
    ) -> Result<Option<AttendanceForm>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance_forms SET
                status = $2,
                reviewer_id = $3,
                review_note = $4,
                reviewed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceForm>(&query)
            .bind(id)
            .bind(status)
            .bind(reviewer_id)
            .bind(note)
            .bind(REQUEST_PENDING)
            .fetch_optional(pool)
            .await
    }
}
