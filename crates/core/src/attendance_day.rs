//! Which attendance day an event belongs to, and what it does to that day's
//! log.
//!
//! There is at most one log per `(user, date)`. A log may hold only a
//! check-in (open), only a check-out (retroactive entry pending its
//! check-in), or both (completed).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::attendance_rules::minute_of_day;
use crate::error::CoreError;
use crate::shift::ShiftWindow;

/// Check-in or check-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Checkin,
    Checkout,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Checkin => "checkin",
            EventKind::Checkout => "checkout",
        }
    }
}

/// Which halves of a day's log are already recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayLogState {
    pub has_checkin: bool,
    pub has_checkout: bool,
}

impl DayLogState {
    /// A check-in without a check-out.
    pub fn is_open(&self) -> bool {
        self.has_checkin && !self.has_checkout
    }

    pub fn is_completed(&self) -> bool {
        self.has_checkin && self.has_checkout
    }
}

/// The write an accepted event performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// No log exists yet for the day; insert one.
    CreateLog,
    /// Fill an empty half of an existing log.
    Fill,
    /// Overwrite an already recorded half (last write wins).
    Replace,
}

/// Decide what a check-in does to the day's log.
///
/// An open log has its check-in replaced, a check-out-only log gets its
/// missing check-in, and a completed log rejects further check-ins.
pub fn plan_checkin(existing: Option<DayLogState>) -> Result<EventAction, CoreError> {
    match existing {
        None => Ok(EventAction::CreateLog),
        Some(state) if state.is_completed() => Err(CoreError::Validation(
            "Already checked out for this attendance day".into(),
        )),
        Some(state) if state.has_checkin => Ok(EventAction::Replace),
        Some(_) => Ok(EventAction::Fill),
    }
}

/// Decide what a check-out does to the day's log.
///
/// Without a log a check-out-only log is created; an existing check-out is
/// replaced.
pub fn plan_checkout(existing: Option<DayLogState>) -> EventAction {
    match existing {
        None => EventAction::CreateLog,
        Some(state) if state.has_checkout => EventAction::Replace,
        Some(_) => EventAction::Fill,
    }
}

/// What is known about the calendar day before the event's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviousDay {
    /// The shift assigned on that day, if any.
    pub window: Option<ShiftWindow>,
    /// That day's log, if any.
    pub log: Option<DayLogState>,
}

impl PreviousDay {
    fn wraps_into(&self, local: NaiveDateTime) -> bool {
        self.window
            .is_some_and(|w| w.crosses_midnight() && minute_of_day(local) < w.end_minutes)
    }
}

/// Attendance date for a check-in at local time `local`.
///
/// Normally the local calendar date. A check-in after midnight that falls
/// inside the previous day's overnight shift, when that day has no log yet,
/// belongs to the previous day (a late arrival for the night shift).
pub fn resolve_checkin_date(local: NaiveDateTime, previous: &PreviousDay) -> NaiveDate {
    let today = local.date();
    if previous.log.is_none() && previous.wraps_into(local) {
        return today - Duration::days(1);
    }
    today
}

/// Attendance date for a check-out at local time `local`.
///
/// Attaches to today's open log first, then to the previous day's open log
/// when that day's shift runs past midnight. With no log on either day, a
/// check-out before the previous overnight shift starts again (and before
/// today's own shift, if any) closes that overnight shift, so a later
/// retroactive check-in completes the same log. Otherwise today.
pub fn resolve_checkout_date(
    local: NaiveDateTime,
    today_log: Option<DayLogState>,
    today_window: Option<ShiftWindow>,
    previous: &PreviousDay,
) -> NaiveDate {
    let today = local.date();
    let yesterday = today - Duration::days(1);
    if today_log.is_some_and(|s| s.is_open()) {
        return today;
    }
    let Some(window) = previous.window.filter(|w| w.crosses_midnight()) else {
        return today;
    };
    if previous.log.is_some_and(|s| s.is_open()) {
        return yesterday;
    }

    let minute = minute_of_day(local);
    let untouched = today_log.is_none() && previous.log.is_none();
    let before_today_shift = today_window.map_or(true, |w| minute < w.start_minutes);
    if untouched && minute < window.start_minutes && before_today_shift {
        return yesterday;
    }
    today
}
