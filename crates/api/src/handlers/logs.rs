//! Handlers for attendance logs: range reads, check-in/check-out and notes.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use validator::Validate;

use rollcall_core::attendance_day::{EventAction, EventKind};
use rollcall_core::error::CoreError;
use rollcall_core::forms::validate_text;
use rollcall_core::geofence::GeoPoint;
use rollcall_core::types::DbId;
use rollcall_db::models::attendance_log::{
    AttendanceEventRequest, AttendanceLog, AttendanceLogDetail,
};
use rollcall_db::models::log_note::{CreateLogNoteRequest, LogNote};
use rollcall_db::repositories::{AttendanceLogRepo, LogNoteRepo, UserRepo};

use crate::engine::attendance_logger::{record, AttendanceEvent};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::scope::{build_scope, Scoped};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/logs?start=&end=&user_id=&user_ids=
///
/// Logs in the range with their notes attached, newest day first.
pub async fn list_logs(
    Scoped { scope, .. }: Scoped,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let user_ids = scope.resolve(&params.requested_users()?);
    let logs =
        AttendanceLogRepo::list_in_range(&state.pool, range.start, range.end, user_ids.as_deref())
            .await?;

    let log_ids: Vec<DbId> = logs.iter().map(|l| l.id).collect();
    let mut notes_by_log: HashMap<DbId, Vec<LogNote>> = HashMap::new();
    for note in LogNoteRepo::list_for_logs(&state.pool, &log_ids).await? {
        notes_by_log.entry(note.log_id).or_default().push(note);
    }

    let data: Vec<AttendanceLogDetail> = logs
        .into_iter()
        .map(|log| {
            let notes = notes_by_log.remove(&log.id).unwrap_or_default();
            AttendanceLogDetail { log, notes }
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/attendance/logs/checkin
pub async fn checkin(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AttendanceEventRequest>,
) -> AppResult<impl IntoResponse> {
    handle_event(&state, &auth, EventKind::Checkin, input).await
}

/// POST /api/v1/attendance/logs/checkout
pub async fn checkout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AttendanceEventRequest>,
) -> AppResult<impl IntoResponse> {
    handle_event(&state, &auth, EventKind::Checkout, input).await
}

/// Shared body of check-in and check-out.
///
/// The event time is the server clock. A manager or admin may instead
/// supply `timestamp` and `user_id` to enter an event retroactively for a
/// user in their scope; staff may not.
async fn handle_event(
    state: &AppState,
    auth: &AuthUser,
    kind: EventKind,
    input: AttendanceEventRequest,
) -> AppResult<(StatusCode, Json<DataResponse<AttendanceLog>>)> {
    input.validate()?;

    let on_behalf = input.user_id.is_some_and(|id| id != auth.user_id);
    if (on_behalf || input.timestamp.is_some()) && !auth.is_manager_or_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only managers and admins may record events for others or with an explicit time"
                .into(),
        )));
    }

    let target_id = input.user_id.unwrap_or(auth.user_id);
    if on_behalf {
        build_scope(state, auth).await?.ensure_permits(target_id)?;
    }
    let target = UserRepo::find_by_id(&state.pool, target_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: target_id,
        }))?;

    let point = match (input.latitude, input.longitude) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "latitude and longitude must be given together".into(),
            ))
        }
    };

    let event = AttendanceEvent {
        user_id: target.id,
        department: target.department,
        at: input.timestamp.unwrap_or_else(Utc::now),
        device_id: input.device_id.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        point,
        photos: input.photos,
    };
    let recorded = record(state, kind, event).await?;

    let status = match recorded.action {
        EventAction::CreateLog => StatusCode::CREATED,
        EventAction::Fill | EventAction::Replace => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: recorded.log })))
}

/// POST /api/v1/attendance/logs/notification
///
/// Attaches an explanatory note to one of the caller's own logs. Logs of
/// other users are reported as not found.
pub async fn add_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLogNoteRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_text("note", &input.note)?;

    let log = AttendanceLogRepo::find_by_id(&state.pool, input.log_id)
        .await?
        .filter(|log| log.user_id == auth.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AttendanceLog",
            id: input.log_id,
        }))?;

    let note = LogNoteRepo::create(&state.pool, log.id, auth.user_id, input.note.trim()).await?;
    tracing::info!(
        user_id = auth.user_id,
        log_id = log.id,
        note_id = note.id,
        "Log note added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}
