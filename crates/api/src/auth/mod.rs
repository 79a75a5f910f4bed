//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation. Tokens are issued by the
//!   organisation's identity service; this crate only verifies them.

pub mod jwt;
