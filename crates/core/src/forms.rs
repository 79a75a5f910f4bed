//! Attendance request forms (leave, device change, other) and log notes.

use chrono::NaiveDate;

use crate::device::{validate_review_decision, REQUEST_PENDING};
use crate::error::CoreError;

pub const FORM_LEAVE: &str = "leave";
pub const FORM_DEVICE: &str = "device";
pub const FORM_OTHER: &str = "other";

/// All recognized form types.
pub const ALL_FORM_TYPES: &[&str] = &[FORM_LEAVE, FORM_DEVICE, FORM_OTHER];

/// Maximum length of a reason, review note or log note.
pub const MAX_TEXT_LEN: usize = 2000;

pub fn validate_form_type(form_type: &str) -> Result<(), CoreError> {
    if ALL_FORM_TYPES.contains(&form_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown form type: '{form_type}'. Valid types: {}",
            ALL_FORM_TYPES.join(", ")
        )))
    }
}

/// Validate a required free-text field: non-blank and bounded.
pub fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must not exceed {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an optional leave period: when both ends are given, `start <= end`.
pub fn validate_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "end_date {end} is before start_date {start}"
            )));
        }
    }
    Ok(())
}

/// Only pending forms can be reviewed, and only to approved/rejected.
pub fn validate_form_review(current: &str, decision: &str) -> Result<(), CoreError> {
    validate_review_decision(decision)?;
    if current != REQUEST_PENDING {
        return Err(CoreError::Validation(format!(
            "Form has already been {current}"
        )));
    }
    Ok(())
}
