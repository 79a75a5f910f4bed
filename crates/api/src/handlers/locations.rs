//! Handlers for the location registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rollcall_core::error::CoreError;
use rollcall_core::geofence::{validate_coordinates, validate_radius};
use rollcall_core::types::DbId;
use rollcall_db::models::location::{CreateLocation, UpdateLocation};
use rollcall_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

fn location_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Location", id })
}

/// GET /api/v1/attendance/locations
pub async fn list_locations(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let locations = LocationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/attendance/locations
pub async fn create_location(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateLocation>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_coordinates(input.latitude, input.longitude)?;
    if let Some(radius) = input.radius_meters {
        validate_radius(radius)?;
    }

    let location = LocationRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        location_id = location.id,
        radius_meters = location.radius_meters,
        "Location created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/attendance/locations/{id}
pub async fn update_location(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(radius) = input.radius_meters {
        validate_radius(radius)?;
    }

    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| location_not_found(id))?;
    tracing::info!(user_id = user.user_id, location_id = id, "Location updated");
    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/attendance/locations/{id}
pub async fn delete_location(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !LocationRepo::delete(&state.pool, id).await? {
        return Err(location_not_found(id));
    }
    tracing::info!(user_id = user.user_id, location_id = id, "Location deleted");
    Ok(StatusCode::NO_CONTENT)
}
