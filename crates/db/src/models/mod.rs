//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request bodies, validated with `validator` where the
//!   rules are per-field
//! - Repository input DTOs filled in by handlers

pub mod assignment;
pub mod attendance_form;
pub mod attendance_log;
pub mod device_request;
pub mod location;
pub mod log_note;
pub mod rule_config;
pub mod shift;
pub mod user;
