//! Workspace-wide attendance tolerances and permissiveness switches.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default grace period before a check-in counts as late, in minutes.
pub const DEFAULT_DELAY_TOLERANCE_MINUTES: i32 = 10;

/// Default grace period before a check-out counts as early, in minutes.
pub const DEFAULT_LEAVE_EARLY_TOLERANCE_MINUTES: i32 = 10;

/// Default pay multiplier reported alongside holiday overtime (300%).
pub const DEFAULT_HOLIDAY_OVERTIME_RATE: f64 = 3.0;

/// Upper bound for either tolerance (one full day).
pub const MAX_TOLERANCE_MINUTES: i32 = 1440;

/// The rule values the attendance engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRules {
    pub delay_tolerance_minutes: i32,
    pub leave_early_tolerance_minutes: i32,
    pub allow_outside_location: bool,
    pub allow_outside_device: bool,
    pub holiday_overtime_rate: f64,
}

impl Default for AttendanceRules {
    fn default() -> Self {
        Self {
            delay_tolerance_minutes: DEFAULT_DELAY_TOLERANCE_MINUTES,
            leave_early_tolerance_minutes: DEFAULT_LEAVE_EARLY_TOLERANCE_MINUTES,
            allow_outside_location: false,
            allow_outside_device: false,
            holiday_overtime_rate: DEFAULT_HOLIDAY_OVERTIME_RATE,
        }
    }
}

impl AttendanceRules {
    /// Whether `late_minutes` is beyond the configured grace period.
    pub fn exceeds_delay_tolerance(&self, late_minutes: i32) -> bool {
        late_minutes > self.delay_tolerance_minutes
    }

    /// Whether `early_minutes` is beyond the configured grace period.
    pub fn exceeds_leave_early_tolerance(&self, early_minutes: i32) -> bool {
        early_minutes > self.leave_early_tolerance_minutes
    }
}

/// Validate a tolerance value (`0..=1440`).
pub fn validate_tolerance(field: &str, minutes: i32) -> Result<(), CoreError> {
    if !(0..=MAX_TOLERANCE_MINUTES).contains(&minutes) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and {MAX_TOLERANCE_MINUTES} (got {minutes})"
        )));
    }
    Ok(())
}

/// Validate the holiday overtime multiplier (finite, at least 1).
pub fn validate_holiday_overtime_rate(rate: f64) -> Result<(), CoreError> {
    if !rate.is_finite() || rate < 1.0 {
        return Err(CoreError::Validation(format!(
            "holiday_overtime_rate must be at least 1 (got {rate})"
        )));
    }
    Ok(())
}

/// Validate a full rule set.
pub fn validate_rules(rules: &AttendanceRules) -> Result<(), CoreError> {
    validate_tolerance("delay_tolerance_minutes", rules.delay_tolerance_minutes)?;
    validate_tolerance(
        "leave_early_tolerance_minutes",
        rules.leave_early_tolerance_minutes,
    )?;
    validate_holiday_overtime_rate(rules.holiday_overtime_rate)
}
