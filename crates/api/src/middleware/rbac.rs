//! Role gates layered on top of [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rollcall_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated manager or admin; anyone else gets 403.
///
/// Guards catalog writes (shifts, locations, rules), assignment writes and
/// workflow reviews. Department limits are applied separately through the
/// caller's access scope.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_manager_or_admin() {
            Ok(RequireManager(user))
        } else {
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Role '{}' may not perform this action; manager or admin required",
                user.role
            ))))
        }
    }
}
