//! Handlers for attendance request forms (leave and similar).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use rollcall_core::error::CoreError;
use rollcall_core::forms::{validate_form_review, validate_form_type, validate_period, validate_text};
use rollcall_core::types::DbId;
use rollcall_db::models::attendance_form::{CreateAttendanceForm, ReviewForm, SubmitForm};
use rollcall_db::repositories::AttendanceFormRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::middleware::scope::{build_scope, Scoped};
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/forms?status=
pub async fn list_forms(
    Scoped { scope, .. }: Scoped,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<impl IntoResponse> {
    let user_ids = scope.resolve(&[]);
    let forms =
        AttendanceFormRepo::list(&state.pool, user_ids.as_deref(), params.status.as_deref())
            .await?;
    Ok(Json(DataResponse { data: forms }))
}

/// POST /api/v1/attendance/forms
pub async fn submit_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitForm>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_form_type(&input.form_type)?;
    validate_text("reason", &input.reason)?;
    validate_period(input.start_date, input.end_date)?;

    let create = CreateAttendanceForm {
        user_id: auth.user_id,
        form_type: input.form_type,
        reason: input.reason.trim().to_string(),
        start_date: input.start_date,
        end_date: input.end_date,
    };
    let form = AttendanceFormRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = auth.user_id,
        form_id = form.id,
        form_type = %form.form_type,
        "Form submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// PATCH /api/v1/attendance/forms/{id}/status
pub async fn review_form(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewForm>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let current = AttendanceFormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AttendanceForm",
            id,
        }))?;

    let scope = build_scope(&state, &user).await?;
    scope.ensure_permits(current.user_id)?;
    validate_form_review(&current.status, &input.status)?;

    let note = input.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let reviewed = AttendanceFormRepo::review(&state.pool, id, &input.status, user.user_id, note)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Form {id} was reviewed concurrently"
            )))
        })?;

    tracing::info!(
        user_id = user.user_id,
        form_id = id,
        status = %reviewed.status,
        "Form reviewed"
    );
    Ok(Json(DataResponse { data: reviewed }))
}
