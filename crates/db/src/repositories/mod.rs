//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run under
//! the per-day attendance lock take a `&mut PgConnection` borrowed from the
//! caller's transaction instead.

pub mod assignment_repo;
pub mod attendance_form_repo;
pub mod attendance_log_repo;
pub mod device_request_repo;
pub mod location_repo;
pub mod log_note_repo;
pub mod rule_config_repo;
pub mod shift_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use attendance_form_repo::AttendanceFormRepo;
pub use attendance_log_repo::AttendanceLogRepo;
pub use device_request_repo::DeviceRequestRepo;
pub use location_repo::LocationRepo;
pub use log_note_repo::LogNoteRepo;
pub use rule_config_repo::RuleConfigRepo;
pub use shift_repo::ShiftRepo;
pub use user_repo::UserRepo;
