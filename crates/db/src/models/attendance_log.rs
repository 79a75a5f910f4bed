//! Per-day attendance logs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::attendance_day::DayLogState;
use rollcall_core::shift::ShiftWindow;
use rollcall_core::types::{DbId, MinuteOfDay, Timestamp};
use rollcall_core::validity::EventValidity;

use super::log_note::LogNote;

/// A row from the `attendance_logs` table.
///
/// Either half may be empty: a check-in-only log is open, a check-out-only
/// log is a retroactive entry waiting for its check-in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceLog {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "date")]
    pub work_date: NaiveDate,
    pub shift_id: Option<DbId>,
    pub shift_name: Option<String>,
    pub shift_start_minutes: Option<MinuteOfDay>,
    pub shift_end_minutes: Option<MinuteOfDay>,

    pub checkin_at: Option<Timestamp>,
    pub checkin_device_id: Option<String>,
    pub checkin_latitude: Option<f64>,
    pub checkin_longitude: Option<f64>,
    pub checkin_location_id: Option<DbId>,
    pub checkin_photos: Vec<String>,
    pub checkin_validity: Option<Json<EventValidity>>,

    pub checkout_at: Option<Timestamp>,
    pub checkout_device_id: Option<String>,
    pub checkout_latitude: Option<f64>,
    pub checkout_longitude: Option<f64>,
    pub checkout_location_id: Option<DbId>,
    pub checkout_photos: Vec<String>,
    pub checkout_validity: Option<Json<EventValidity>>,

    pub late_minutes: i32,
    pub early_minutes: i32,
    pub overtime_minutes: i32,
    pub is_holiday: bool,
    pub holiday_overtime_rate: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AttendanceLog {
    pub fn day_state(&self) -> DayLogState {
        DayLogState {
            has_checkin: self.checkin_at.is_some(),
            has_checkout: self.checkout_at.is_some(),
        }
    }

    /// The snapshot window, when the log was scheduled.
    pub fn window(&self) -> Option<ShiftWindow> {
        match (self.shift_start_minutes, self.shift_end_minutes) {
            (Some(start), Some(end)) => ShiftWindow::new(start, end).ok(),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> ShiftSnapshot {
        ShiftSnapshot {
            shift_id: self.shift_id,
            shift_name: self.shift_name.clone(),
            start_minutes: self.shift_start_minutes,
            end_minutes: self.shift_end_minutes,
        }
    }

    /// Whether either recorded event failed device or location checks.
    pub fn has_invalid_event(&self) -> bool {
        [&self.checkin_validity, &self.checkout_validity]
            .into_iter()
            .flatten()
            .any(|v| !v.0.is_valid())
    }
}

/// The scheduled shift copied onto a log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftSnapshot {
    pub shift_id: Option<DbId>,
    pub shift_name: Option<String>,
    pub start_minutes: Option<MinuteOfDay>,
    pub end_minutes: Option<MinuteOfDay>,
}

impl ShiftSnapshot {
    pub fn window(&self) -> Option<ShiftWindow> {
        match (self.start_minutes, self.end_minutes) {
            (Some(start), Some(end)) => ShiftWindow::new(start, end).ok(),
            _ => None,
        }
    }
}

/// Everything captured for one check-in or check-out.
#[derive(Debug, Clone)]
pub struct EventCapture {
    pub at: Timestamp,
    pub device_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_id: Option<DbId>,
    pub photos: Vec<String>,
    pub validity: EventValidity,
}

/// Request body for `POST /logs/checkin` and `POST /logs/checkout`.
///
/// `timestamp` and `user_id` are honoured only for managers and admins
/// recording an event on someone's behalf.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttendanceEventRequest {
    #[validate(length(max = 255))]
    pub device_id: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub photos: Vec<String>,
    pub timestamp: Option<Timestamp>,
    pub user_id: Option<DbId>,
}

/// A log together with the notes attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceLogDetail {
    #[serde(flatten)]
    pub log: AttendanceLog,
    pub notes: Vec<LogNote>,
}
