//! Public-holiday lookup.
//!
//! Holidays are a static, year-keyed table of calendar dates resolved ahead
//! of time (lunar holidays included). The service never computes them; it
//! is handed a [`HolidayCalendar`] at startup.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

/// Read-only source of public-holiday dates.
pub trait HolidayCalendar: Send + Sync {
    /// Holiday dates for `year`, ascending. Unknown years yield nothing.
    fn holidays_in(&self, year: i32) -> Vec<NaiveDate>;

    /// Whether `date` is a public holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays_in(date.year()).contains(&date)
    }
}

/// In-memory holiday table keyed by year.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayCalendar {
    by_year: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl StaticHolidayCalendar {
    /// An empty calendar (no holidays at all).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(year, ["yyyy-MM-dd", ...])` entries.
    ///
    /// Every date must parse and belong to the year it is listed under.
    pub fn from_entries<'a, I, D>(entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (i32, D)>,
        D: IntoIterator<Item = &'a str>,
    {
        let mut calendar = Self::default();
        for (year, dates) in entries {
            for raw in dates {
                calendar.insert(year, raw)?;
            }
        }
        Ok(calendar)
    }

    /// Parse a JSON object of the form `{ "2024": ["2024-01-01", ...] }`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid holiday calendar JSON: {e}")))?;

        let mut calendar = Self::default();
        for (year, dates) in &raw {
            let year: i32 = year.parse().map_err(|_| {
                CoreError::Validation(format!("Invalid holiday calendar year: '{year}'"))
            })?;
            for date in dates {
                calendar.insert(year, date)?;
            }
        }
        Ok(calendar)
    }

    /// The built-in table (2020-2030), extended with `overrides`.
    ///
    /// A year present in `overrides` replaces the built-in list for that year.
    pub fn builtin_with(overrides: StaticHolidayCalendar) -> Self {
        let mut calendar = Self::builtin();
        for (year, dates) in overrides.by_year {
            calendar.by_year.insert(year, dates);
        }
        calendar
    }

    /// The built-in national holiday table for 2020-2030.
    ///
    /// Covers New Year, the five-day lunar new year break, Hung Kings'
    /// commemoration, Reunification Day, Labour Day and the two-day National
    /// Day holiday.
    pub fn builtin() -> Self {
        let mut calendar = Self::default();
        for (year, dates) in BUILTIN_HOLIDAYS {
            for date in *dates {
                // The table is a compile-time constant and covered by tests.
                if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    calendar.by_year.entry(*year).or_default().insert(parsed);
                }
            }
        }
        calendar
    }

    /// Years with at least one entry.
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    fn insert(&mut self, year: i32, raw: &str) -> Result<(), CoreError> {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            CoreError::Validation(format!("Invalid holiday date: '{raw}' (expected yyyy-MM-dd)"))
        })?;
        if date.year() != year {
            return Err(CoreError::Validation(format!(
                "Holiday {raw} is listed under year {year}"
            )));
        }
        self.by_year.entry(year).or_default().insert(date);
        Ok(())
    }
}

impl HolidayCalendar for StaticHolidayCalendar {
    fn holidays_in(&self, year: i32) -> Vec<NaiveDate> {
        self.by_year
            .get(&year)
            .map(|dates| dates.iter().copied().collect())
            .unwrap_or_default()
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.by_year
            .get(&date.year())
            .is_some_and(|dates| dates.contains(&date))
    }
}

const BUILTIN_HOLIDAYS: &[(i32, &[&str])] = &[
    (
        2020,
        &[
            "2020-01-01", "2020-01-22", "2020-01-23", "2020-01-24", "2020-01-25", "2020-01-26",
            "2020-04-02", "2020-04-30", "2020-05-01", "2020-09-02", "2020-09-03",
        ],
    ),
    (
        2021,
        &[
            "2021-01-01", "2021-02-09", "2021-02-10", "2021-02-11", "2021-02-12", "2021-02-13",
            "2021-04-21", "2021-04-30", "2021-05-01", "2021-09-02", "2021-09-03",
        ],
    ),
    (
        2022,
        &[
            "2022-01-01", "2022-01-29", "2022-01-30", "2022-01-31", "2022-02-01", "2022-02-02",
            "2022-04-10", "2022-04-30", "2022-05-01", "2022-09-02", "2022-09-03",
        ],
    ),
    (
        2023,
        &[
            "2023-01-01", "2023-01-19", "2023-01-20", "2023-01-21", "2023-01-22", "2023-01-23",
            "2023-04-29", "2023-04-30", "2023-05-01", "2023-09-02", "2023-09-03",
        ],
    ),
    (
        2024,
        &[
            "2024-01-01", "2024-02-07", "2024-02-08", "2024-02-09", "2024-02-10", "2024-02-11",
            "2024-04-18", "2024-04-30", "2024-05-01", "2024-09-02", "2024-09-03",
        ],
    ),
    (
        2025,
        &[
            "2025-01-01", "2025-01-26", "2025-01-27", "2025-01-28", "2025-01-29", "2025-01-30",
            "2025-04-07", "2025-04-30", "2025-05-01", "2025-09-02", "2025-09-03",
        ],
    ),
    (
        2026,
        &[
            "2026-01-01", "2026-02-14", "2026-02-15", "2026-02-16", "2026-02-17", "2026-02-18",
            "2026-04-26", "2026-04-30", "2026-05-01", "2026-09-02", "2026-09-03",
        ],
    ),
    (
        2027,
        &[
            "2027-01-01", "2027-02-03", "2027-02-04", "2027-02-05", "2027-02-06", "2027-02-07",
            "2027-04-15", "2027-04-30", "2027-05-01", "2027-09-02", "2027-09-03",
        ],
    ),
    (
        2028,
        &[
            "2028-01-01", "2028-01-23", "2028-01-24", "2028-01-25", "2028-01-26", "2028-01-27",
            "2028-04-03", "2028-04-30", "2028-05-01", "2028-09-02", "2028-09-03",
        ],
    ),
    (
        2029,
        &[
            "2029-01-01", "2029-02-10", "2029-02-11", "2029-02-12", "2029-02-13", "2029-02-14",
            "2029-04-22", "2029-04-30", "2029-05-01", "2029-09-02", "2029-09-03",
        ],
    ),
    (
        2030,
        &[
            "2030-01-01", "2030-01-30", "2030-01-31", "2030-02-01", "2030-02-02", "2030-02-03",
            "2030-04-11", "2030-04-30", "2030-05-01", "2030-09-02", "2030-09-03",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn builtin_table_parses_completely() {
        let calendar = StaticHolidayCalendar::builtin();
        assert_eq!(calendar.years(), (2020..=2030).collect::<Vec<_>>());
        for year in 2020..=2030 {
            assert_eq!(calendar.holidays_in(year).len(), 11, "year {year}");
        }
    }

    #[test]
    fn builtin_table_keeps_every_listed_date() {
        let strict = StaticHolidayCalendar::from_entries(
            BUILTIN_HOLIDAYS.iter().map(|(year, dates)| (*year, dates.iter().copied())),
        );
        assert!(strict.is_ok(), "{:?}", strict.err());

        let calendar = StaticHolidayCalendar::builtin();
        for (year, dates) in BUILTIN_HOLIDAYS {
            assert_eq!(calendar.holidays_in(*year).len(), dates.len(), "year {year}");
        }
    }

    #[test]
    fn holiday_and_adjacent_day() {
        let calendar = StaticHolidayCalendar::builtin();
        assert!(calendar.is_holiday(date("2024-04-30")));
        assert!(calendar.is_holiday(date("2024-05-01")));
        assert!(!calendar.is_holiday(date("2024-05-02")));
        assert!(!calendar.is_holiday(date("2024-04-29")));
    }

    #[test]
    fn unknown_year_has_no_holidays() {
        let calendar = StaticHolidayCalendar::builtin();
        assert!(calendar.holidays_in(1999).is_empty());
        assert!(!calendar.is_holiday(date("1999-01-01")));
    }

    #[test]
    fn json_overrides_replace_whole_year() {
        let overrides =
            StaticHolidayCalendar::from_json(r#"{"2024": ["2024-12-25"], "2031": ["2031-01-01"]}"#)
                .unwrap();
        let calendar = StaticHolidayCalendar::builtin_with(overrides);
        assert!(calendar.is_holiday(date("2024-12-25")));
        assert!(!calendar.is_holiday(date("2024-01-01")));
        assert!(calendar.is_holiday(date("2031-01-01")));
        assert!(calendar.is_holiday(date("2025-01-01")));
    }

    #[test]
    fn json_rejects_misfiled_dates() {
        assert!(StaticHolidayCalendar::from_json(r#"{"2024": ["2025-01-01"]}"#).is_err());
        assert!(StaticHolidayCalendar::from_json(r#"{"2024": ["01/01/2024"]}"#).is_err());
        assert!(StaticHolidayCalendar::from_json("[]").is_err());
    }

    #[test]
    fn from_entries_builds_calendar() {
        let calendar =
            StaticHolidayCalendar::from_entries([(2024, ["2024-06-01", "2024-06-02"])]).unwrap();
        assert!(calendar.is_holiday(date("2024-06-01")));
        assert!(!calendar.is_holiday(date("2024-06-03")));
    }
}
