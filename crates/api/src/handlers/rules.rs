//! Handlers for the attendance rule configuration.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use rollcall_core::rule_config::validate_rules;
use rollcall_db::models::rule_config::UpdateRuleConfig;
use rollcall_db::repositories::RuleConfigRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance/rules
pub async fn get_rules(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let config = RuleConfigRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/attendance/rules
///
/// Omitted fields keep their current value. New values apply to events
/// recorded after the change.
pub async fn update_rules(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<UpdateRuleConfig>,
) -> AppResult<impl IntoResponse> {
    let current = RuleConfigRepo::get(&state.pool).await?;
    let rules = input.apply_to(current.rules());
    validate_rules(&rules)?;

    let config = RuleConfigRepo::update(&state.pool, &rules, user.user_id).await?;
    tracing::info!(
        user_id = user.user_id,
        delay_tolerance_minutes = rules.delay_tolerance_minutes,
        leave_early_tolerance_minutes = rules.leave_early_tolerance_minutes,
        allow_outside_location = rules.allow_outside_location,
        allow_outside_device = rules.allow_outside_device,
        "Attendance rules updated"
    );
    Ok(Json(DataResponse { data: config }))
}
