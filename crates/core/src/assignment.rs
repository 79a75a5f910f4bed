//! Shift assignment planning: date ranges, auto-assignment by weekday
//! pattern, and bulk batch preparation.
//!
//! Assignments are keyed by `(user_id, date)` with replace semantics, so a
//! batch is a list of independent writes. Auto-assignment is sugar that
//! expands to the same list a manager would have entered by hand.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Longest accepted date range, in days (inclusive span).
pub const MAX_RANGE_DAYS: i64 = 366;

/// Largest accepted bulk batch.
pub const MAX_BATCH_ITEMS: usize = 10_000;

pub const MODE_EMPLOYEE: &str = "employee";
pub const MODE_SHIFT: &str = "shift";
pub const MODE_DAY: &str = "day";
pub const MODE_WEEK: &str = "week";

/// Grid orientations a client may report. Has no server-side effect.
pub const ALL_MODES: &[&str] = &[MODE_EMPLOYEE, MODE_SHIFT, MODE_DAY, MODE_WEEK];

/// One `(user, date) -> shift` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentItem {
    pub user_id: DbId,
    pub shift_id: DbId,
    pub date: NaiveDate,
}

impl AssignmentItem {
    pub fn key(&self) -> (DbId, NaiveDate) {
        (self.user_id, self.date)
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a validated range (`start <= end`, at most [`MAX_RANGE_DAYS`]).
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "Date range end {end} is before start {start}"
            )));
        }
        let span = (end - start).num_days() + 1;
        if span > MAX_RANGE_DAYS {
            return Err(CoreError::Validation(format!(
                "Date range must not exceed {MAX_RANGE_DAYS} days (got {span})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Validate the client-reported grid mode.
pub fn validate_mode(mode: &str) -> Result<(), CoreError> {
    if ALL_MODES.contains(&mode) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown assignment mode: '{mode}'. Valid modes: {}",
            ALL_MODES.join(", ")
        )))
    }
}

/// Weekday index with Sunday = 0 through Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Validate a weekday -> shift map (keys `0..=6`, at least one entry).
pub fn validate_weekday_map(map: &BTreeMap<u8, DbId>) -> Result<(), CoreError> {
    if map.is_empty() {
        return Err(CoreError::Validation(
            "At least one weekday must be selected".into(),
        ));
    }
    if let Some(bad) = map.keys().find(|k| **k > 6) {
        return Err(CoreError::Validation(format!(
            "Weekday must be between 0 (Sunday) and 6 (Saturday) (got {bad})"
        )));
    }
    Ok(())
}

/// Expand an auto-assignment into explicit items.
///
/// For every date in `range` whose weekday has an entry in `weekday_shifts`,
/// yields one item per user. Order is date-major, then user order as given.
pub fn expand_auto_assign(
    user_ids: &[DbId],
    weekday_shifts: &BTreeMap<u8, DbId>,
    range: DateRange,
) -> Vec<AssignmentItem> {
    range
        .days()
        .filter_map(|date| {
            weekday_shifts
                .get(&weekday_index(date))
                .map(|shift_id| (date, *shift_id))
        })
        .flat_map(|(date, shift_id)| {
            user_ids.iter().map(move |user_id| AssignmentItem {
                user_id: *user_id,
                shift_id,
                date,
            })
        })
        .collect()
}

/// Collapse a batch so each `(user, date)` key appears once.
///
/// The last occurrence of a key wins, matching what sequential replace
/// writes would leave behind. Returned pairs keep the winning item's
/// original index, in index order.
pub fn dedupe_last_wins(items: &[AssignmentItem]) -> Vec<(usize, AssignmentItem)> {
    let mut last: HashMap<(DbId, NaiveDate), usize> = HashMap::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        last.insert(item.key(), index);
    }
    let mut winners: Vec<usize> = last.into_values().collect();
    winners.sort_unstable();
    winners.into_iter().map(|i| (i, items[i])).collect()
}

/// Validate the size of a batch.
pub fn validate_batch_size(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "assignments must contain at least one item".into(),
        ));
    }
    if count > MAX_BATCH_ITEMS {
        return Err(CoreError::Validation(format!(
            "assignments must not exceed {MAX_BATCH_ITEMS} items (got {count})"
        )));
    }
    Ok(())
}

/// A per-item failure in a bulk write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub index: usize,
    pub user_id: DbId,
    pub shift_id: DbId,
    pub date: NaiveDate,
    pub error: String,
}

/// Partial-success report for a bulk write.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkReport {
    /// Number of items written.
    pub applied: usize,
    /// Items in the request that were superseded by a later valid item with
    /// the same `(user, date)` key.
    pub superseded: usize,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn record_failure(&mut self, index: usize, item: &AssignmentItem, error: impl Into<String>) {
        self.failed.push(BulkFailure {
            index,
            user_id: item.user_id,
            shift_id: item.shift_id,
            date: item.date,
            error: error.into(),
        });
    }

    /// Sort failures by request index for stable output.
    pub fn finish(mut self) -> Self {
        self.failed.sort_by_key(|f| f.index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn mon_wed_fri(shift: DbId) -> BTreeMap<u8, DbId> {
        BTreeMap::from([(1, shift), (3, shift), (5, shift)])
    }

    fn manual_enumeration(
        users: &[DbId],
        map: &BTreeMap<u8, DbId>,
        range: DateRange,
    ) -> Vec<AssignmentItem> {
        let mut out = Vec::new();
        let mut day = range.start;
        while day <= range.end {
            if let Some(shift_id) = map.get(&weekday_index(day)) {
                for user_id in users {
                    out.push(AssignmentItem {
                        user_id: *user_id,
                        shift_id: *shift_id,
                        date: day,
                    });
                }
            }
            day = day.succ_opt().unwrap();
        }
        out
    }

    #[test]
    fn two_weeks_mon_wed_fri_gives_six_per_user_for_any_start() {
        let users = [1, 2, 3];
        let map = mon_wed_fri(10);
        // 2024-06-03 is a Monday; try all seven start weekdays.
        for offset in 0..7 {
            let start = date("2024-06-03") + chrono::Duration::days(offset);
            let range = DateRange::new(start, start + chrono::Duration::days(13)).unwrap();
            let items = expand_auto_assign(&users, &map, range);
            assert_eq!(items.len(), 18, "start {start}");
            for user in users {
                assert_eq!(items.iter().filter(|i| i.user_id == user).count(), 6);
            }
            assert_eq!(items, manual_enumeration(&users, &map, range));
        }
    }

    #[test]
    fn weekday_index_starts_on_sunday() {
        assert_eq!(weekday_index(date("2024-06-02")), 0);
        assert_eq!(weekday_index(date("2024-06-03")), 1);
        assert_eq!(weekday_index(date("2024-06-08")), 6);
    }

    #[test]
    fn per_weekday_shifts_are_respected() {
        let map = BTreeMap::from([(6, 20), (0, 21)]);
        let range = DateRange::new(date("2024-06-01"), date("2024-06-02")).unwrap();
        let items = expand_auto_assign(&[5], &map, range);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].shift_id, 20);
        assert_eq!(items[1].shift_id, 21);
    }

    #[test]
    fn range_validation() {
        assert!(DateRange::new(date("2024-06-02"), date("2024-06-01")).is_err());
        assert!(DateRange::new(date("2024-01-01"), date("2024-12-31")).is_ok());
        assert!(DateRange::new(date("2024-01-01"), date("2025-01-01")).is_err());
        let single = DateRange::new(date("2024-06-01"), date("2024-06-01")).unwrap();
        assert_eq!(single.days().count(), 1);
        assert_eq!(single.len_days(), 1);
    }

    #[test]
    fn weekday_map_validation() {
        assert!(validate_weekday_map(&BTreeMap::new()).is_err());
        assert!(validate_weekday_map(&BTreeMap::from([(7, 1)])).is_err());
        assert!(validate_weekday_map(&BTreeMap::from([(0, 1)])).is_ok());
    }

    #[test]
    fn dedupe_keeps_last_write_per_key() {
        let d = date("2024-06-01");
        let items = [
            AssignmentItem { user_id: 1, shift_id: 10, date: d },
            AssignmentItem { user_id: 2, shift_id: 10, date: d },
            AssignmentItem { user_id: 1, shift_id: 11, date: d },
        ];
        let winners = dedupe_last_wins(&items);
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0], (1, items[1]));
        assert_eq!(winners[1], (2, items[2]));
    }

    #[test]
    fn mode_and_batch_validation() {
        assert!(validate_mode("employee").is_ok());
        assert!(validate_mode("shift").is_ok());
        assert!(validate_mode("month").is_err());
        assert!(validate_batch_size(0).is_err());
        assert!(validate_batch_size(10).is_ok());
        assert!(validate_batch_size(MAX_BATCH_ITEMS + 1).is_err());
    }

    #[test]
    fn bulk_report_sorts_failures() {
        let item = AssignmentItem { user_id: 1, shift_id: 2, date: date("2024-06-01") };
        let mut report = BulkReport::default();
        report.record_failure(4, &item, "b");
        report.record_failure(1, &item, "a");
        let report = report.finish();
        assert_eq!(report.failed[0].index, 1);
        assert_eq!(report.failed[1].index, 4);
    }
}
