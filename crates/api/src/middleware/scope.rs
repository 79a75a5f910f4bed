//! Per-request access scope extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rollcall_core::access::AccessScope;
use rollcall_core::roles::ROLE_MANAGER;
use rollcall_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated user together with the set of users they may see.
///
/// Admins see everyone, managers see the active members of their
/// department, and everyone else sees only themselves. A manager token
/// without a department claim falls back to self-only.
pub struct Scoped {
    pub user: AuthUser,
    pub scope: AccessScope,
}

impl FromRequestParts<AppState> for Scoped {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let scope = build_scope(state, &user).await?;
        Ok(Scoped { user, scope })
    }
}

/// Resolve the [`AccessScope`] for `user`.
pub async fn build_scope(state: &AppState, user: &AuthUser) -> Result<AccessScope, AppError> {
    if user.is_admin() {
        return Ok(AccessScope::All);
    }
    match (&user.department, user.role.eq_ignore_ascii_case(ROLE_MANAGER)) {
        (Some(department), true) => {
            let mut members = UserRepo::department_members(&state.pool, department).await?;
            if !members.contains(&user.user_id) {
                members.push(user.user_id);
            }
            Ok(AccessScope::Department {
                department: department.clone(),
                members,
            })
        }
        _ => Ok(AccessScope::SelfOnly(user.user_id)),
    }
}
