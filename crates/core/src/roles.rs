//! Well-known role name constants.
//!
//! These must match the `role` values written into the `users` directory
//! table and the `role` claim of access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_STAFF: &str = "staff";

/// All recognized role names.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF];

/// Whether the role may manage shifts, locations, rules and reviews.
pub fn is_manager_or_admin(role: &str) -> bool {
    role.eq_ignore_ascii_case(ROLE_ADMIN) || role.eq_ignore_ascii_case(ROLE_MANAGER)
}
