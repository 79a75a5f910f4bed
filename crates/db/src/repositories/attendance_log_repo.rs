//! Repository for the `attendance_logs` table.
//!
//! Event writes take a connection from the caller's transaction, which must
//! already hold the advisory lock for the `(user, date)` being written (see
//! [`crate::lock_attendance_day`]).

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use rollcall_core::attendance_day::EventKind;
use rollcall_core::attendance_rules::AttendanceFacts;
use rollcall_core::types::DbId;

use crate::models::attendance_log::{AttendanceLog, EventCapture, ShiftSnapshot};

/// Column list for attendance_logs queries.
const COLUMNS: &str = "id, user_id, work_date, shift_id, shift_name, shift_start_minutes, \
    shift_end_minutes, \
    checkin_at, checkin_device_id, checkin_latitude, checkin_longitude, checkin_location_id, \
    checkin_photos, checkin_validity, \
    checkout_at, checkout_device_id, checkout_latitude, checkout_longitude, \
    checkout_location_id, checkout_photos, checkout_validity, \
    late_minutes, early_minutes, overtime_minutes, is_holiday, holiday_overtime_rate, status, \
    created_at, updated_at";

/// The seven columns holding one event half, for `kind`.
fn event_columns(kind: EventKind) -> String {
    let p = kind.as_str();
    format!(
        "{p}_at, {p}_device_id, {p}_latitude, {p}_longitude, {p}_location_id, {p}_photos, {p}_validity"
    )
}

/// Provides reads and locked event writes for attendance logs.
pub struct AttendanceLogRepo;

impl AttendanceLogRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AttendanceLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance_logs WHERE id = $1");
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The log for one day, read on the caller's transaction.
    pub async fn find_for_day(
        conn: &mut PgConnection,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_logs
             WHERE user_id = $1 AND work_date = $2"
        );
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(user_id)
            .bind(work_date)
            .fetch_optional(conn)
            .await
    }

    /// Create the day's log holding a single event.
    pub async fn insert_with_event(
        conn: &mut PgConnection,
        user_id: DbId,
        work_date: NaiveDate,
        snapshot: &ShiftSnapshot,
        kind: EventKind,
        event: &EventCapture,
        facts: &AttendanceFacts,
    ) -> Result<AttendanceLog, sqlx::Error> {
        let event_cols = event_columns(kind);
        let query = format!(
            "INSERT INTO attendance_logs
                (user_id, work_date, shift_id, shift_name, shift_start_minutes, shift_end_minutes,
                 {event_cols},
                 late_minutes, early_minutes, overtime_minutes, is_holiday,
                 holiday_overtime_rate, status)
             VALUES ($1, $2, $3, $4, $5, $6,
                     $7, $8, $9, $10, $11, $12, $13,
                     $14, $15, $16, $17, $18, $19)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(user_id)
            .bind(work_date)
            .bind(snapshot.shift_id)
            .bind(&snapshot.shift_name)
            .bind(snapshot.start_minutes)
            .bind(snapshot.end_minutes)
            .bind(event.at)
            .bind(&event.device_id)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(event.location_id)
            .bind(&event.photos)
            .bind(Json(&event.validity))
            .bind(facts.late_minutes)
            .bind(facts.early_minutes)
            .bind(facts.overtime_minutes)
            .bind(facts.is_holiday)
            .bind(facts.holiday_overtime_rate)
            .bind(facts.status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Overwrite one event half of an existing log and store the recomputed
    /// derived fields.
    pub async fn record_event(
        conn: &mut PgConnection,
        id: DbId,
        kind: EventKind,
        event: &EventCapture,
        facts: &AttendanceFacts,
    ) -> Result<AttendanceLog, sqlx::Error> {
        let p = kind.as_str();
        let query = format!(
            "UPDATE attendance_logs SET
                {p}_at = $2,
                {p}_device_id = $3,
                {p}_latitude = $4,
                {p}_longitude = $5,
                {p}_location_id = $6,
                {p}_photos = $7,
                {p}_validity = $8,
                late_minutes = $9,
                early_minutes = $10,
                overtime_minutes = $11,
                is_holiday = $12,
                holiday_overtime_rate = $13,
                status = $14,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(id)
            .bind(event.at)
            .bind(&event.device_id)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(event.location_id)
            .bind(&event.photos)
            .bind(Json(&event.validity))
            .bind(facts.late_minutes)
            .bind(facts.early_minutes)
            .bind(facts.overtime_minutes)
            .bind(facts.is_holiday)
            .bind(facts.holiday_overtime_rate)
            .bind(facts.status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Logs in `[start, end]`, optionally restricted to `user_ids`, newest
    /// day first.
    pub async fn list_in_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
        user_ids: Option<&[DbId]>,
    ) -> Result<Vec<AttendanceLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_logs
             WHERE work_date BETWEEN $1 AND $2
               AND ($3::BIGINT[] IS NULL OR user_id = ANY($3))
             ORDER BY work_date DESC, user_id ASC"
        );
        sqlx::query_as::<_, AttendanceLog>(&query)
            .bind(start)
            .bind(end)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }
}
