//! Attendance domain logic with no I/O.
//!
//! Everything here is pure computation over plain values so the API and
//! repository layers can share it and it can be unit-tested without a
//! database.

pub mod access;
pub mod assignment;
pub mod attendance_day;
pub mod attendance_rules;
pub mod device;
pub mod error;
pub mod forms;
pub mod geofence;
pub mod holiday;
pub mod report;
pub mod roles;
pub mod rule_config;
pub mod shift;
pub mod types;
pub mod validity;
