//! Reconciliation of a scheduled shift against actual check-in/check-out
//! times.
//!
//! All arithmetic happens on a continuous minute axis anchored at midnight of
//! the log's date, so an overnight shift `[23:00, 06:00)` becomes
//! `[1380, 1800)` and a 06:15 checkout on the following day becomes `1815`.
//!
//! Lateness, early departure and overtime are raw deltas. Tolerances from
//! [`AttendanceRules`] are applied by consumers deciding whether to flag a
//! value, never subtracted here.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::holiday::HolidayCalendar;
use crate::rule_config::AttendanceRules;
use crate::shift::{ShiftWindow, MINUTES_PER_DAY};
use crate::types::{MinuteOfDay, Timestamp};

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";

/// Completion state of an attendance log.
///
/// There is no timeout transition: a log without a checkout stays `Pending`
/// however long ago the shift ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Pending,
    Completed,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Pending => STATUS_PENDING,
            AttendanceStatus::Completed => STATUS_COMPLETED,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_PENDING => Ok(AttendanceStatus::Pending),
            STATUS_COMPLETED => Ok(AttendanceStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown attendance status: '{other}'"
            ))),
        }
    }

    /// Completed once both events are present.
    pub fn from_events(has_checkin: bool, has_checkout: bool) -> Self {
        if has_checkin && has_checkout {
            AttendanceStatus::Completed
        } else {
            AttendanceStatus::Pending
        }
    }
}

/* --------------------------------------------------------------------------
Wraparound arithmetic
-------------------------------------------------------------------------- */

/// Minute-of-day of a local timestamp (`toMin`).
pub fn minute_of_day(timestamp: NaiveDateTime) -> MinuteOfDay {
    (timestamp.hour() * 60 + timestamp.minute()) as MinuteOfDay
}

/// Place `timestamp` on the shift's continuous minute axis (`norm`).
///
/// The axis starts at midnight of `reference_date` (the scheduled day), so
/// the timestamp's minute-of-day is shifted by whole days of distance from
/// that date. An early-morning checkout after an overnight shift therefore
/// lands past 1440, while a pre-shift check-in on the scheduled evening
/// (22:55 for a 23:00 start) stays before the start. Timestamps on an
/// earlier day yield negative values.
pub fn effective_minute(timestamp: NaiveDateTime, reference_date: NaiveDate) -> MinuteOfDay {
    let day_offset = (timestamp.date() - reference_date).num_days() as MinuteOfDay;
    minute_of_day(timestamp) + day_offset * MINUTES_PER_DAY
}

/// Convert a stored UTC instant to the organisation's local wall clock.
pub fn to_local(timestamp: Timestamp, offset: FixedOffset) -> NaiveDateTime {
    timestamp.with_timezone(&offset).naive_local()
}

/// Build a fixed UTC offset from a minute count (e.g. `420` for UTC+7).
pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, CoreError> {
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
        CoreError::Validation(format!("UTC offset of {minutes} minutes is out of range"))
    })
}

/* --------------------------------------------------------------------------
Reconciliation
-------------------------------------------------------------------------- */

/// Everything the engine needs about one log.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput {
    /// The scheduled window, if the user had an assignment that day.
    pub window: Option<ShiftWindow>,
    /// The log's calendar date (the scheduled day).
    pub work_date: NaiveDate,
    /// Local wall-clock check-in time.
    pub checkin: Option<NaiveDateTime>,
    /// Local wall-clock check-out time.
    pub checkout: Option<NaiveDateTime>,
}

/// Derived attendance facts for one log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceFacts {
    pub late_minutes: i32,
    pub early_minutes: i32,
    pub overtime_minutes: i32,
    pub is_holiday: bool,
    /// Pay multiplier reported with holiday overtime; `None` on normal days.
    pub holiday_overtime_rate: Option<f64>,
    pub status: AttendanceStatus,
}

/// Derive lateness, early departure, overtime, holiday flag and status.
///
/// Without a scheduled window all minute values are zero; the holiday flag
/// and status are still computed.
pub fn reconcile(
    input: &ReconcileInput,
    rules: &AttendanceRules,
    calendar: &dyn HolidayCalendar,
) -> AttendanceFacts {
    let mut late_minutes = 0;
    let mut early_minutes = 0;
    let mut overtime_minutes = 0;

    if let Some(window) = input.window {
        let end_effective = window.end_effective();

        if let Some(checkin) = input.checkin {
            let checkin_eff = effective_minute(checkin, input.work_date);
            late_minutes = (checkin_eff - window.start_minutes).max(0);
        }

        if let Some(checkout) = input.checkout {
            let checkout_eff = effective_minute(checkout, input.work_date);
            early_minutes = (end_effective - checkout_eff).max(0);
            overtime_minutes = (checkout_eff - end_effective).max(0);
        }
    }

    let is_holiday = calendar.is_holiday(input.work_date);

    AttendanceFacts {
        late_minutes,
        early_minutes,
        overtime_minutes,
        is_holiday,
        holiday_overtime_rate: is_holiday.then_some(rules.holiday_overtime_rate),
        status: AttendanceStatus::from_events(input.checkin.is_some(), input.checkout.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::StaticHolidayCalendar;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn overnight() -> ShiftWindow {
        ShiftWindow::new(1380, 360).unwrap()
    }

    fn day_shift() -> ShiftWindow {
        ShiftWindow::new(480, 1020).unwrap()
    }

    fn run(
        window: ShiftWindow,
        work_date: &str,
        checkin: Option<&str>,
        checkout: Option<&str>,
    ) -> AttendanceFacts {
        let input = ReconcileInput {
            window: Some(window),
            work_date: date(work_date),
            checkin: checkin.map(at),
            checkout: checkout.map(at),
        };
        reconcile(&input, &AttendanceRules::default(), &StaticHolidayCalendar::builtin())
    }

    // -- effective_minute --

    #[test]
    fn next_day_checkout_lands_past_midnight() {
        let eff = effective_minute(at("2024-06-02 06:15"), date("2024-06-01"));
        assert_eq!(eff, 1815);
    }

    #[test]
    fn pre_shift_checkin_on_scheduled_evening_is_not_wrapped() {
        let eff = effective_minute(at("2024-06-01 22:55"), date("2024-06-01"));
        assert_eq!(eff, 1375);
    }

    #[test]
    fn evening_minute_on_reference_day_is_plain() {
        let eff = effective_minute(at("2024-06-01 23:30"), date("2024-06-01"));
        assert_eq!(eff, 1410);
    }

    #[test]
    fn morning_minute_on_reference_day_is_plain() {
        let eff = effective_minute(at("2024-06-01 07:00"), date("2024-06-01"));
        assert_eq!(eff, 420);
    }

    #[test]
    fn day_shift_checkout_after_midnight_counts_as_next_day() {
        let eff = effective_minute(at("2024-06-02 01:00"), date("2024-06-01"));
        assert_eq!(eff, 1500);
    }

    #[test]
    fn earlier_day_is_negative() {
        let eff = effective_minute(at("2024-05-31 23:00"), date("2024-06-01"));
        assert_eq!(eff, -60);
    }

    // -- reconcile --

    #[test]
    fn overnight_checkin_thirty_minutes_late() {
        let facts = run(overnight(), "2024-06-01", Some("2024-06-01 23:30"), None);
        assert_eq!(facts.late_minutes, 30);
        assert_eq!(facts.status, AttendanceStatus::Pending);
    }

    #[test]
    fn overnight_checkout_fifteen_minutes_overtime() {
        let facts = run(
            overnight(),
            "2024-06-01",
            Some("2024-06-01 23:00"),
            Some("2024-06-02 06:15"),
        );
        assert_eq!(facts.early_minutes, 0);
        assert_eq!(facts.overtime_minutes, 15);
        assert_eq!(facts.late_minutes, 0);
        assert_eq!(facts.status, AttendanceStatus::Completed);
    }

    #[test]
    fn overnight_checkout_before_end_is_early() {
        let facts = run(
            overnight(),
            "2024-06-01",
            Some("2024-06-01 22:55"),
            Some("2024-06-02 05:20"),
        );
        assert_eq!(facts.late_minutes, 0);
        assert_eq!(facts.early_minutes, 40);
        assert_eq!(facts.overtime_minutes, 0);
    }

    #[test]
    fn checkin_after_midnight_on_overnight_shift_is_late() {
        let facts = run(overnight(), "2024-06-01", Some("2024-06-02 00:10"), None);
        assert_eq!(facts.late_minutes, 70);
    }

    #[test]
    fn day_shift_without_checkout_stays_pending() {
        let facts = run(day_shift(), "2024-06-03", Some("2024-06-03 08:05"), None);
        assert_eq!(facts.status, AttendanceStatus::Pending);
        assert_eq!(facts.late_minutes, 5);
        assert_eq!(facts.early_minutes, 0);
        assert_eq!(facts.overtime_minutes, 0);
    }

    #[test]
    fn early_checkin_is_not_negative_lateness() {
        let facts = run(day_shift(), "2024-06-03", Some("2024-06-03 07:30"), Some("2024-06-03 17:00"));
        assert_eq!(facts.late_minutes, 0);
        assert_eq!(facts.early_minutes, 0);
        assert_eq!(facts.overtime_minutes, 0);
    }

    #[test]
    fn tolerance_is_not_subtracted() {
        let facts = run(day_shift(), "2024-06-03", Some("2024-06-03 08:04"), None);
        assert_eq!(facts.late_minutes, 4);
    }

    #[test]
    fn checkout_only_log_is_pending_with_early_minutes() {
        let facts = run(day_shift(), "2024-06-03", None, Some("2024-06-03 16:00"));
        assert_eq!(facts.status, AttendanceStatus::Pending);
        assert_eq!(facts.late_minutes, 0);
        assert_eq!(facts.early_minutes, 60);
    }

    #[test]
    fn holiday_flag_attaches_rate() {
        let facts = run(day_shift(), "2024-09-02", Some("2024-09-02 08:00"), Some("2024-09-02 18:00"));
        assert!(facts.is_holiday);
        assert_eq!(facts.holiday_overtime_rate, Some(3.0));
        assert_eq!(facts.overtime_minutes, 60);

        let adjacent = run(day_shift(), "2024-09-04", Some("2024-09-04 08:00"), None);
        assert!(!adjacent.is_holiday);
        assert_eq!(adjacent.holiday_overtime_rate, None);
    }

    #[test]
    fn unscheduled_log_has_zero_minutes() {
        let input = ReconcileInput {
            window: None,
            work_date: date("2024-06-03"),
            checkin: Some(at("2024-06-03 09:00")),
            checkout: Some(at("2024-06-03 12:00")),
        };
        let facts = reconcile(&input, &AttendanceRules::default(), &StaticHolidayCalendar::empty());
        assert_eq!(facts.late_minutes, 0);
        assert_eq!(facts.overtime_minutes, 0);
        assert_eq!(facts.status, AttendanceStatus::Completed);
    }

    #[test]
    fn to_local_applies_offset() {
        let offset = offset_from_minutes(420).unwrap();
        let utc = chrono::DateTime::parse_from_rfc3339("2024-06-01T16:30:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(to_local(utc, offset), at("2024-06-01 23:30"));
        assert!(offset_from_minutes(100_000).is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!(AttendanceStatus::parse("pending").unwrap(), AttendanceStatus::Pending);
        assert_eq!(AttendanceStatus::Completed.as_str(), "completed");
        assert!(AttendanceStatus::parse("in-progress").is_err());
    }
}
