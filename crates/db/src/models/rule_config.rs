//! The singleton attendance rule row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use rollcall_core::rule_config::AttendanceRules;
use rollcall_core::types::{DbId, Timestamp};

/// The row from the `attendance_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleConfig {
    pub delay_tolerance_minutes: i32,
    pub leave_early_tolerance_minutes: i32,
    pub allow_outside_location: bool,
    pub allow_outside_device: bool,
    pub holiday_overtime_rate: f64,
    pub updated_by: Option<DbId>,
    pub updated_at: Timestamp,
}

impl RuleConfig {
    pub fn rules(&self) -> AttendanceRules {
        AttendanceRules {
            delay_tolerance_minutes: self.delay_tolerance_minutes,
            leave_early_tolerance_minutes: self.leave_early_tolerance_minutes,
            allow_outside_location: self.allow_outside_location,
            allow_outside_device: self.allow_outside_device,
            holiday_overtime_rate: self.holiday_overtime_rate,
        }
    }
}

/// Request body for `PUT /rules`. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRuleConfig {
    pub delay_tolerance_minutes: Option<i32>,
    pub leave_early_tolerance_minutes: Option<i32>,
    pub allow_outside_location: Option<bool>,
    pub allow_outside_device: Option<bool>,
    pub holiday_overtime_rate: Option<f64>,
}

impl UpdateRuleConfig {
    /// Overlay the patch on `current`.
    pub fn apply_to(&self, current: AttendanceRules) -> AttendanceRules {
        AttendanceRules {
            delay_tolerance_minutes: self
                .delay_tolerance_minutes
                .unwrap_or(current.delay_tolerance_minutes),
            leave_early_tolerance_minutes: self
                .leave_early_tolerance_minutes
                .unwrap_or(current.leave_early_tolerance_minutes),
            allow_outside_location: self
                .allow_outside_location
                .unwrap_or(current.allow_outside_location),
            allow_outside_device: self
                .allow_outside_device
                .unwrap_or(current.allow_outside_device),
            holiday_overtime_rate: self
                .holiday_overtime_rate
                .unwrap_or(current.holiday_overtime_rate),
        }
    }
}
