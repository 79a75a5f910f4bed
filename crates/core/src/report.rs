//! Read-side attendance summaries.
//!
//! Merges recorded logs with scheduled days that have no log, so a shift
//! nobody checked in for still shows up as a pending row. Nothing here is
//! persisted.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::assignment::DateRange;
use crate::attendance_rules::AttendanceStatus;
use crate::holiday::HolidayCalendar;
use crate::rule_config::AttendanceRules;
use crate::types::DbId;

/// The facts of one recorded log the aggregator reads.
#[derive(Debug, Clone)]
pub struct LogFact {
    pub log_id: DbId,
    pub user_id: DbId,
    pub date: NaiveDate,
    pub shift_name: Option<String>,
    pub has_checkin: bool,
    pub has_checkout: bool,
    pub late_minutes: i32,
    pub early_minutes: i32,
    pub overtime_minutes: i32,
    pub is_holiday: bool,
    /// Whether any recorded event carries an invalid marker.
    pub has_invalid_event: bool,
}

/// A scheduled `(user, date)` from the assignment table.
#[derive(Debug, Clone)]
pub struct ScheduledDay {
    pub user_id: DbId,
    pub date: NaiveDate,
    pub shift_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// A stored attendance log.
    Logged,
    /// Synthesized from an assignment with no log yet.
    NotCheckedIn,
}

/// One line of the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub kind: RowKind,
    pub log_id: Option<DbId>,
    pub user_id: DbId,
    pub date: NaiveDate,
    pub shift_name: Option<String>,
    pub status: AttendanceStatus,
    pub late_minutes: i32,
    pub early_minutes: i32,
    pub overtime_minutes: i32,
    pub is_holiday: bool,
    /// Lateness beyond the delay tolerance.
    pub is_late: bool,
    /// Early departure beyond the leave-early tolerance.
    pub is_early: bool,
    pub missing_checkout: bool,
    pub missing_checkin: bool,
    pub has_invalid_event: bool,
}

/// Per-user totals over the range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserTotals {
    pub user_id: DbId,
    pub scheduled: u32,
    pub worked: u32,
    pub completed: u32,
    pub late: u32,
    pub early: u32,
    pub missing_checkout: u32,
    pub missing_checkin: u32,
    /// Scheduled past days with no log at all.
    pub absent: u32,
    pub invalid_events: u32,
    pub overtime_minutes: i64,
    pub holiday_overtime_minutes: i64,
}

/// Per-day counts for dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayHistogram {
    pub date: NaiveDate,
    pub scheduled: u32,
    pub checked_in: u32,
    pub completed: u32,
    pub late: u32,
    pub early: u32,
    pub missing_checkout: u32,
    pub absent: u32,
}

impl DayHistogram {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub range: DateRange,
    pub rows: Vec<ReportRow>,
    pub users: Vec<UserTotals>,
    pub days: Vec<DayHistogram>,
}

/// Build the report for `range`.
///
/// `user_ids` seeds zero totals for users with no activity. Synthesized rows
/// for dates before `today` count as absences; today and later are merely
/// upcoming. Synthesized rows take their holiday flag from `holidays`.
/// Inputs outside the range are ignored.
pub fn aggregate(
    range: DateRange,
    user_ids: &[DbId],
    logs: &[LogFact],
    schedule: &[ScheduledDay],
    rules: &AttendanceRules,
    holidays: &dyn HolidayCalendar,
    today: NaiveDate,
) -> AttendanceReport {
    let mut users: BTreeMap<DbId, UserTotals> = user_ids
        .iter()
        .map(|id| {
            (
                *id,
                UserTotals {
                    user_id: *id,
                    ..Default::default()
                },
            )
        })
        .collect();
    let mut days: BTreeMap<NaiveDate, DayHistogram> =
        range.days().map(|d| (d, DayHistogram::empty(d))).collect();

    let scheduled_keys: HashSet<(DbId, NaiveDate)> = schedule
        .iter()
        .filter(|s| range.contains(s.date))
        .map(|s| (s.user_id, s.date))
        .collect();
    let logged_keys: HashSet<(DbId, NaiveDate)> = logs
        .iter()
        .filter(|l| range.contains(l.date))
        .map(|l| (l.user_id, l.date))
        .collect();

    let mut rows = Vec::with_capacity(logs.len() + schedule.len());

    for log in logs.iter().filter(|l| range.contains(l.date)) {
        let row = logged_row(log, rules);
        let totals = users.entry(log.user_id).or_insert_with(|| UserTotals {
            user_id: log.user_id,
            ..Default::default()
        });
        let day = days
            .entry(log.date)
            .or_insert_with(|| DayHistogram::empty(log.date));

        if scheduled_keys.contains(&(log.user_id, log.date)) {
            totals.scheduled += 1;
            day.scheduled += 1;
        }
        if log.has_checkin {
            totals.worked += 1;
            day.checked_in += 1;
        }
        if row.status == AttendanceStatus::Completed {
            totals.completed += 1;
            day.completed += 1;
        }
        if row.is_late {
            totals.late += 1;
            day.late += 1;
        }
        if row.is_early {
            totals.early += 1;
            day.early += 1;
        }
        if row.missing_checkout {
            totals.missing_checkout += 1;
            day.missing_checkout += 1;
        }
        if row.missing_checkin {
            totals.missing_checkin += 1;
        }
        if log.has_invalid_event {
            totals.invalid_events += 1;
        }
        totals.overtime_minutes += i64::from(log.overtime_minutes);
        if log.is_holiday {
            totals.holiday_overtime_minutes += i64::from(log.overtime_minutes);
        }
        rows.push(row);
    }

    for slot in schedule.iter().filter(|s| range.contains(s.date)) {
        if logged_keys.contains(&(slot.user_id, slot.date)) {
            continue;
        }
        let totals = users.entry(slot.user_id).or_insert_with(|| UserTotals {
            user_id: slot.user_id,
            ..Default::default()
        });
        let day = days
            .entry(slot.date)
            .or_insert_with(|| DayHistogram::empty(slot.date));

        totals.scheduled += 1;
        day.scheduled += 1;
        if slot.date < today {
            totals.absent += 1;
            day.absent += 1;
        }
        rows.push(ReportRow {
            kind: RowKind::NotCheckedIn,
            log_id: None,
            user_id: slot.user_id,
            date: slot.date,
            shift_name: Some(slot.shift_name.clone()),
            status: AttendanceStatus::Pending,
            late_minutes: 0,
            early_minutes: 0,
            overtime_minutes: 0,
            is_holiday: holidays.is_holiday(slot.date),
            is_late: false,
            is_early: false,
            missing_checkout: false,
            missing_checkin: false,
            has_invalid_event: false,
        });
    }

    rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.user_id.cmp(&b.user_id)));

    AttendanceReport {
        range,
        rows,
        users: users.into_values().collect(),
        days: days.into_values().collect(),
    }
}

fn logged_row(log: &LogFact, rules: &AttendanceRules) -> ReportRow {
    let status = AttendanceStatus::from_events(log.has_checkin, log.has_checkout);
    ReportRow {
        kind: RowKind::Logged,
        log_id: Some(log.log_id),
        user_id: log.user_id,
        date: log.date,
        shift_name: log.shift_name.clone(),
        status,
        late_minutes: log.late_minutes,
        early_minutes: log.early_minutes,
        overtime_minutes: log.overtime_minutes,
        is_holiday: log.is_holiday,
        is_late: log.has_checkin && rules.exceeds_delay_tolerance(log.late_minutes),
        is_early: log.has_checkout && rules.exceeds_leave_early_tolerance(log.early_minutes),
        missing_checkout: log.has_checkin && !log.has_checkout,
        missing_checkin: !log.has_checkin && log.has_checkout,
        has_invalid_event: log.has_invalid_event,
    }
}
