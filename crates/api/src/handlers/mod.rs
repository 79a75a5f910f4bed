//! Request handlers for the attendance resources.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `rollcall_db` (or to the
//! [`crate::engine`] for multi-step writes) and map errors via
//! [`crate::error::AppError`].

pub mod assignments;
pub mod devices;
pub mod forms;
pub mod locations;
pub mod logs;
pub mod reports;
pub mod rules;
pub mod shifts;
