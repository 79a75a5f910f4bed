//! Handlers for shift assignments: range reads, bulk and weekday-pattern
//! writes, and single-cell clears.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use rollcall_core::assignment::{
    expand_auto_assign, validate_mode, validate_weekday_map, AssignmentItem, DateRange,
};
use rollcall_db::models::assignment::{
    AutoAssignRequest, BulkAssignRequest, DeleteAssignmentParams,
};
use rollcall_db::repositories::AssignmentRepo;

use crate::engine::assignment_runner::{run_bulk, BulkOptions, PlannedAssignment};
use crate::error::AppResult;
use crate::middleware::rbac::RequireManager;
use crate::middleware::scope::{build_scope, Scoped};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/assignments?start=&end=&user_ids=
///
/// Filtered by the caller's access scope.
pub async fn list_assignments(
    Scoped { scope, .. }: Scoped,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let user_ids = scope.resolve(&params.requested_users()?);
    let assignments =
        AssignmentRepo::list_in_range(&state.pool, range.start, range.end, user_ids.as_deref())
            .await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// POST /api/v1/attendance/assignments/bulk
///
/// Always 200; per-item failures are listed in the report.
pub async fn bulk_assign(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<BulkAssignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(mode) = &input.mode {
        validate_mode(mode)?;
    }
    let scope = build_scope(&state, &user).await?;

    let planned: Vec<PlannedAssignment> = input
        .assignments
        .iter()
        .map(|a| PlannedAssignment {
            item: AssignmentItem {
                user_id: a.user_id,
                shift_id: a.shift_id,
                date: a.date,
            },
            flexible: a.flexible,
        })
        .collect();

    let options = BulkOptions {
        mode: input.mode,
        created_by: user.user_id,
        concurrency: state.config.bulk_assign_concurrency,
    };
    let report = run_bulk(&state.pool, &scope, &planned, &options).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/attendance/assignments/auto
///
/// Expands a weekday -> shift map over a date range into the same writes a
/// bulk request enumerating every matching date would make.
pub async fn auto_assign(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<AutoAssignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(mode) = &input.mode {
        validate_mode(mode)?;
    }
    validate_weekday_map(&input.weekday_shifts)?;
    let range = DateRange::new(input.start, input.end)?;
    let scope = build_scope(&state, &user).await?;

    let planned: Vec<PlannedAssignment> =
        expand_auto_assign(&input.user_ids, &input.weekday_shifts, range)
            .into_iter()
            .map(|item| PlannedAssignment {
                item,
                flexible: input.flexible,
            })
            .collect();

    tracing::debug!(
        user_id = user.user_id,
        users = input.user_ids.len(),
        items = planned.len(),
        start = %range.start,
        end = %range.end,
        "Auto-assignment expanded"
    );

    let options = BulkOptions {
        mode: input.mode,
        created_by: user.user_id,
        concurrency: state.config.bulk_assign_concurrency,
    };
    let report = run_bulk(&state.pool, &scope, &planned, &options).await?;
    Ok(Json(DataResponse { data: report }))
}

#[derive(Debug, Serialize)]
pub struct DeleteAssignmentResponse {
    pub deleted: bool,
}

/// DELETE /api/v1/attendance/assignments?user_id=&date=
///
/// Clears one grid cell. Idempotent: `deleted` is false when the cell was
/// already empty.
pub async fn delete_assignment(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Query(params): Query<DeleteAssignmentParams>,
) -> AppResult<impl IntoResponse> {
    let scope = build_scope(&state, &user).await?;
    scope.ensure_permits(params.user_id)?;

    let deleted = AssignmentRepo::delete_for_day(&state.pool, params.user_id, params.date).await?;
    tracing::info!(
        user_id = user.user_id,
        target_user_id = params.user_id,
        date = %params.date,
        deleted,
        "Assignment cleared"
    );
    Ok(Json(DataResponse {
        data: DeleteAssignmentResponse { deleted },
    }))
}
