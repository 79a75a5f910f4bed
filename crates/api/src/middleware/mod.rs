//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireManager`] -- Requires the `manager` or `admin` role.
//! - [`scope::Scoped`] -- The authenticated user plus their [`AccessScope`].
//!
//! [`AccessScope`]: rollcall_core::access::AccessScope

pub mod auth;
pub mod rbac;
pub mod scope;
