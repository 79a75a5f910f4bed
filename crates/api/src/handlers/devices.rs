//! Handlers for the device approval workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rollcall_core::device::{validate_device_id, validate_review_transition};
use rollcall_core::error::CoreError;
use rollcall_core::types::DbId;
use rollcall_db::models::device_request::{
    CreateDeviceRequest, ReviewDeviceRequest, SubmitDeviceRequest,
};
use rollcall_db::repositories::DeviceRequestRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::middleware::scope::{build_scope, Scoped};
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/devices?status=
pub async fn list_devices(
    Scoped { scope, .. }: Scoped,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<impl IntoResponse> {
    let user_ids = scope.resolve(&[]);
    let requests =
        DeviceRequestRepo::list(&state.pool, user_ids.as_deref(), params.status.as_deref())
            .await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/attendance/devices
///
/// Submits a device change for the caller. The request starts pending.
pub async fn submit_device(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitDeviceRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_device_id(&input.new_device_id)?;

    let create = CreateDeviceRequest {
        user_id: auth.user_id,
        old_device_id: input.old_device_id,
        old_device_name: input.old_device_name,
        old_device_type: input.old_device_type,
        new_device_id: input.new_device_id.trim().to_string(),
        new_device_name: input.new_device_name,
        new_device_type: input.new_device_type,
        require_gps: input.require_gps.unwrap_or(true),
    };
    let request = DeviceRequestRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = auth.user_id,
        request_id = request.id,
        "Device request submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// PATCH /api/v1/attendance/devices/{id}/status
///
/// Managers may review requests from their own department; admins may
/// review any.
pub async fn review_device(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewDeviceRequest>,
) -> AppResult<impl IntoResponse> {
    let current = DeviceRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeviceRequest",
            id,
        }))?;

    let scope = build_scope(&state, &user).await?;
    scope.ensure_permits(current.user_id)?;
    validate_review_transition(&current.status, &input.status)?;

    let reviewed =
        DeviceRequestRepo::review(&state.pool, id, &current.status, &input.status, user.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "Device request {id} was reviewed concurrently"
                )))
            })?;

    tracing::info!(
        user_id = user.user_id,
        request_id = id,
        from = %current.status,
        to = %reviewed.status,
        "Device request reviewed"
    );
    Ok(Json(DataResponse { data: reviewed }))
}
