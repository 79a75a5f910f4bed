//! Shift definitions: kinds, time-of-day windows and their validation.
//!
//! A shift window is a pair of minute-of-day values on the organisation's
//! local wall clock. An end at or before the start means the shift runs past
//! midnight into the next calendar day.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::MinuteOfDay;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: MinuteOfDay = 1440;

/// Shift kind: `day` is a whole-day shift, `hour` is an hourly slot.
pub const SHIFT_KIND_DAY: &str = "day";
pub const SHIFT_KIND_HOUR: &str = "hour";

/// All recognized shift kinds.
pub const ALL_SHIFT_KINDS: &[&str] = &[SHIFT_KIND_DAY, SHIFT_KIND_HOUR];

/// Maximum length of a shift name.
pub const MAX_SHIFT_NAME_LEN: usize = 100;

/// A scheduled time-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start_minutes: MinuteOfDay,
    pub end_minutes: MinuteOfDay,
}

impl ShiftWindow {
    /// Build a window, validating both bounds.
    pub fn new(start_minutes: MinuteOfDay, end_minutes: MinuteOfDay) -> Result<Self, CoreError> {
        validate_window(start_minutes, end_minutes)?;
        Ok(Self {
            start_minutes,
            end_minutes,
        })
    }

    /// Whether the window runs past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end_minutes <= self.start_minutes
    }

    /// End of the window on a continuous axis starting at the scheduled
    /// day's midnight. May exceed [`MINUTES_PER_DAY`].
    pub fn end_effective(&self) -> MinuteOfDay {
        if self.crosses_midnight() {
            self.end_minutes + MINUTES_PER_DAY
        } else {
            self.end_minutes
        }
    }

    /// Scheduled length of the window in minutes.
    pub fn duration_minutes(&self) -> MinuteOfDay {
        self.end_effective() - self.start_minutes
    }
}

/// Validate that `name` is non-empty after trimming and not too long.
pub fn validate_shift_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Shift name must not be empty".into()));
    }
    if trimmed.len() > MAX_SHIFT_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Shift name must not exceed {MAX_SHIFT_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that the given kind is a recognized shift kind.
pub fn validate_shift_kind(kind: &str) -> Result<(), CoreError> {
    if ALL_SHIFT_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown shift type: '{kind}'. Valid types: {}",
            ALL_SHIFT_KINDS.join(", ")
        )))
    }
}

/// Validate a single minute-of-day value.
pub fn validate_minute_of_day(field: &str, value: MinuteOfDay) -> Result<(), CoreError> {
    if !(0..MINUTES_PER_DAY).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and {} (got {value})",
            MINUTES_PER_DAY - 1
        )));
    }
    Ok(())
}

/// Validate both window bounds and that they differ.
pub fn validate_window(start: MinuteOfDay, end: MinuteOfDay) -> Result<(), CoreError> {
    validate_minute_of_day("start_minutes", start)?;
    validate_minute_of_day("end_minutes", end)?;
    if start == end {
        return Err(CoreError::Validation(
            "Shift start and end must differ".into(),
        ));
    }
    Ok(())
}

/// Parse an `"HH:MM"` wall-clock string into a minute-of-day.
pub fn parse_hhmm(value: &str) -> Result<MinuteOfDay, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid time format: '{value}' (expected HH:MM)"));

    let (h, m) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: MinuteOfDay = h.trim().parse().map_err(|_| invalid())?;
    let minutes: MinuteOfDay = m.trim().parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Format a minute-of-day as `"HH:MM"`.
pub fn format_hhmm(minutes: MinuteOfDay) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// A shift time as accepted on the wire: either minutes or `"HH:MM"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeOfDay {
    Minutes(MinuteOfDay),
    Clock(String),
}

impl TimeOfDay {
    /// Resolve to a validated minute-of-day.
    pub fn to_minutes(&self, field: &str) -> Result<MinuteOfDay, CoreError> {
        let minutes = match self {
            TimeOfDay::Minutes(m) => *m,
            TimeOfDay::Clock(s) => parse_hhmm(s)?,
        };
        validate_minute_of_day(field, minutes)?;
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn day_window_does_not_cross_midnight() {
        let w = ShiftWindow::new(480, 1020).unwrap();
        assert!(!w.crosses_midnight());
        assert_eq!(w.end_effective(), 1020);
        assert_eq!(w.duration_minutes(), 540);
    }

    #[test]
    fn overnight_window_wraps() {
        let w = ShiftWindow::new(1380, 360).unwrap();
        assert!(w.crosses_midnight());
        assert_eq!(w.end_effective(), 1800);
        assert_eq!(w.duration_minutes(), 420);
    }

    #[test]
    fn midnight_end_counts_as_wrap() {
        let w = ShiftWindow::new(960, 0).unwrap();
        assert_eq!(w.end_effective(), 1440);
    }

    #[test]
    fn equal_bounds_rejected() {
        assert_matches!(ShiftWindow::new(600, 600), Err(CoreError::Validation(_)));
    }

    #[test]
    fn out_of_range_rejected() {
        assert_matches!(ShiftWindow::new(-1, 600), Err(CoreError::Validation(_)));
        assert_matches!(ShiftWindow::new(0, 1440), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_shift_name("   ").is_err());
        assert!(validate_shift_name("Morning").is_ok());
    }

    #[test]
    fn kind_must_be_known() {
        assert!(validate_shift_kind("day").is_ok());
        assert!(validate_shift_kind("hour").is_ok());
        assert!(validate_shift_kind("week").is_err());
    }

    #[test]
    fn parse_and_format_clock() {
        assert_eq!(parse_hhmm("08:30").unwrap(), 510);
        assert_eq!(parse_hhmm("23:00").unwrap(), 1380);
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("8h30").is_err());
        assert_eq!(format_hhmm(375), "06:15");
        assert_eq!(format_hhmm(1815), "06:15");
    }

    #[test]
    fn wire_time_accepts_both_forms() {
        let minutes: TimeOfDay = serde_json::from_str("480").unwrap();
        let clock: TimeOfDay = serde_json::from_str("\"08:00\"").unwrap();
        assert_eq!(minutes.to_minutes("start").unwrap(), 480);
        assert_eq!(clock.to_minutes("start").unwrap(), 480);
        let bad: TimeOfDay = serde_json::from_str("2000").unwrap();
        assert!(bad.to_minutes("start").is_err());
    }
}
