//! Handlers for the shift catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rollcall_core::error::CoreError;
use rollcall_core::shift::{validate_shift_kind, validate_shift_name, validate_window};
use rollcall_core::types::DbId;
use rollcall_db::models::shift::{CreateShift, CreateShiftRequest, UpdateShift, UpdateShiftRequest};
use rollcall_db::repositories::shift_repo::ShiftDeletion;
use rollcall_db::repositories::ShiftRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

fn shift_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Shift", id })
}

/// GET /api/v1/attendance/shifts
pub async fn list_shifts(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let shifts = ShiftRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: shifts }))
}

/// GET /api/v1/attendance/shifts/{id}
pub async fn get_shift(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let shift = ShiftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| shift_not_found(id))?;
    Ok(Json(DataResponse { data: shift }))
}

/// POST /api/v1/attendance/shifts
///
/// Times may be sent as minutes since midnight or as `"HH:MM"`. An end at
/// or before the start makes an overnight shift.
pub async fn create_shift(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateShiftRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = input.name.trim().to_string();
    validate_shift_name(&name)?;
    validate_shift_kind(&input.kind)?;
    let start_minutes = input.start_minutes.to_minutes("start_minutes")?;
    let end_minutes = input.end_minutes.to_minutes("end_minutes")?;
    validate_window(start_minutes, end_minutes)?;

    let create = CreateShift {
        name,
        kind: input.kind,
        start_minutes,
        end_minutes,
        departments: input.departments,
        color: input.color.unwrap_or_default(),
        created_by: Some(user.user_id),
    };
    let shift = ShiftRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = user.user_id,
        shift_id = shift.id,
        start_minutes,
        end_minutes,
        "Shift created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: shift })))
}

/// PUT /api/v1/attendance/shifts/{id}
///
/// Only future writes see the new values; existing assignments keep their
/// snapshot.
pub async fn update_shift(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShiftRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let current = ShiftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| shift_not_found(id))?;

    let name = input.name.as_deref().map(str::trim).map(str::to_string);
    if let Some(name) = &name {
        validate_shift_name(name)?;
    }
    if let Some(kind) = &input.kind {
        validate_shift_kind(kind)?;
    }
    let start_minutes = input
        .start_minutes
        .as_ref()
        .map(|t| t.to_minutes("start_minutes"))
        .transpose()?;
    let end_minutes = input
        .end_minutes
        .as_ref()
        .map(|t| t.to_minutes("end_minutes"))
        .transpose()?;
    validate_window(
        start_minutes.unwrap_or(current.start_minutes),
        end_minutes.unwrap_or(current.end_minutes),
    )?;

    let update = UpdateShift {
        name,
        kind: input.kind,
        start_minutes,
        end_minutes,
        departments: input.departments,
        color: input.color,
    };
    let shift = ShiftRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| shift_not_found(id))?;

    tracing::info!(user_id = user.user_id, shift_id = id, "Shift updated");
    Ok(Json(DataResponse { data: shift }))
}

/// DELETE /api/v1/attendance/shifts/{id}
///
/// Refused with 409 while any assignment dated today or later uses the
/// shift.
pub async fn delete_shift(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let today = state.local_today();
    match ShiftRepo::delete_unless_scheduled(&state.pool, id, today).await? {
        ShiftDeletion::Deleted => {
            tracing::info!(user_id = user.user_id, shift_id = id, "Shift deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        ShiftDeletion::NotFound => Err(shift_not_found(id)),
        ShiftDeletion::InUse => Err(AppError::Core(CoreError::Conflict(format!(
            "Shift {id} is assigned on or after {today}; reassign those days first"
        )))),
    }
}
