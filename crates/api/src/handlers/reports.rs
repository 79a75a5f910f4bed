//! Handler for the attendance summary report.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use rollcall_core::report::{aggregate, LogFact, ScheduledDay};
use rollcall_core::types::DbId;
use rollcall_db::repositories::{AssignmentRepo, AttendanceLogRepo, RuleConfigRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::scope::Scoped;
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/reports/summary?start=&end=&user_ids=
///
/// Detail rows, per-user totals and per-day counts over the range. Days
/// scheduled but without a log appear as "not checked in" rows.
pub async fn summary(
    Scoped { scope, .. }: Scoped,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let filter = scope.resolve(&params.requested_users()?);
    let pool = &state.pool;

    let rules = RuleConfigRepo::get(pool).await?.rules();
    let logs = AttendanceLogRepo::list_in_range(pool, range.start, range.end, filter.as_deref())
        .await?;
    let assignments =
        AssignmentRepo::list_in_range(pool, range.start, range.end, filter.as_deref()).await?;

    let user_ids: Vec<DbId> = match filter {
        Some(ids) => ids,
        None => UserRepo::list_active(pool, None)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect(),
    };

    let facts: Vec<LogFact> = logs
        .iter()
        .map(|log| LogFact {
            log_id: log.id,
            user_id: log.user_id,
            date: log.work_date,
            shift_name: log.shift_name.clone(),
            has_checkin: log.checkin_at.is_some(),
            has_checkout: log.checkout_at.is_some(),
            late_minutes: log.late_minutes,
            early_minutes: log.early_minutes,
            overtime_minutes: log.overtime_minutes,
            is_holiday: log.is_holiday,
            has_invalid_event: log.has_invalid_event(),
        })
        .collect();
    let schedule: Vec<ScheduledDay> = assignments
        .into_iter()
        .map(|a| ScheduledDay {
            user_id: a.user_id,
            date: a.work_date,
            shift_name: a.shift_name,
        })
        .collect();

    let report = aggregate(
        range,
        &user_ids,
        &facts,
        &schedule,
        &rules,
        state.holidays.as_ref(),
        state.local_today(),
    );
    tracing::debug!(
        users = report.users.len(),
        rows = report.rows.len(),
        start = %range.start,
        end = %range.end,
        "Attendance summary built"
    );
    Ok(Json(DataResponse { data: report }))
}
