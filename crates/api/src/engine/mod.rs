//! Orchestration over the repositories.
//!
//! - [`assignment_runner`] -- bulk and weekday-pattern assignment writes
//!   with per-item failure reporting.
//! - [`attendance_logger`] -- check-in/check-out recording under the
//!   per-day lock, with validity checks and rule recomputation.

pub mod assignment_runner;
pub mod attendance_logger;
