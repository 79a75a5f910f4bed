//! Device approval workflow: request statuses and device validity.

use crate::error::CoreError;
use crate::validity::InvalidReason;

pub const REQUEST_PENDING: &str = "pending";
pub const REQUEST_APPROVED: &str = "approved";
pub const REQUEST_REJECTED: &str = "rejected";

/// All recognized review statuses.
pub const ALL_REQUEST_STATUSES: &[&str] = &[REQUEST_PENDING, REQUEST_APPROVED, REQUEST_REJECTED];

/// Maximum length of a device identifier.
pub const MAX_DEVICE_ID_LEN: usize = 255;

/// Validate a reviewer's decision: only `approved` or `rejected`.
pub fn validate_review_decision(status: &str) -> Result<(), CoreError> {
    if status == REQUEST_APPROVED || status == REQUEST_REJECTED {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid review status: '{status}'. Expected '{REQUEST_APPROVED}' or '{REQUEST_REJECTED}'"
        )))
    }
}

/// Validate a review transition.
///
/// A pending request can be approved or rejected. A decided request can be
/// flipped by a later review (e.g. revoking a lost phone), but never back to
/// pending.
pub fn validate_review_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_review_decision(to)?;
    if !ALL_REQUEST_STATUSES.contains(&from) {
        return Err(CoreError::Internal(format!(
            "Unknown device request status '{from}'"
        )));
    }
    if from == to {
        return Err(CoreError::Validation(format!(
            "Device request is already {to}"
        )));
    }
    Ok(())
}

/// Validate the identifier of a requested device.
pub fn validate_device_id(device_id: &str) -> Result<(), CoreError> {
    let trimmed = device_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Device id must not be empty".into()));
    }
    if trimmed.len() > MAX_DEVICE_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Device id must not exceed {MAX_DEVICE_ID_LEN} characters"
        )));
    }
    Ok(())
}

/// Check an event's device against the user's approved set.
///
/// Returns the reasons the device is invalid; empty when valid or when the
/// rules allow any device.
pub fn check_device(
    device_id: Option<&str>,
    approved_devices: &[String],
    allow_outside: bool,
) -> Vec<InvalidReason> {
    if allow_outside {
        return vec![];
    }
    match device_id.map(str::trim).filter(|d| !d.is_empty()) {
        None => vec![InvalidReason::MissingDevice],
        Some(id) if approved_devices.iter().any(|d| d == id) => vec![],
        Some(id) => vec![InvalidReason::UnapprovedDevice {
            device_id: id.to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn approved_device_is_valid() {
        let approved = vec!["phone-1".to_string()];
        assert!(check_device(Some("phone-1"), &approved, false).is_empty());
    }

    #[test]
    fn unapproved_device_is_flagged() {
        let approved = vec!["phone-1".to_string()];
        assert_matches!(
            check_device(Some("phone-2"), &approved, false).as_slice(),
            [InvalidReason::UnapprovedDevice { device_id }] if device_id == "phone-2"
        );
    }

    #[test]
    fn missing_device_is_flagged() {
        assert_matches!(
            check_device(Some("  "), &[], false).as_slice(),
            [InvalidReason::MissingDevice]
        );
        assert_matches!(check_device(None, &[], false).as_slice(), [InvalidReason::MissingDevice]);
    }

    #[test]
    fn allow_outside_device_accepts_anything() {
        assert!(check_device(Some("unknown"), &[], true).is_empty());
        assert!(check_device(None, &[], true).is_empty());
    }

    #[test]
    fn review_transitions() {
        assert!(validate_review_transition("pending", "approved").is_ok());
        assert!(validate_review_transition("pending", "rejected").is_ok());
        assert!(validate_review_transition("approved", "rejected").is_ok());
        assert!(validate_review_transition("approved", "approved").is_err());
        assert!(validate_review_transition("approved", "pending").is_err());
    }

    #[test]
    fn device_id_validation() {
        assert!(validate_device_id("").is_err());
        assert!(validate_device_id("abc").is_ok());
        assert!(validate_device_id(&"x".repeat(300)).is_err());
    }
}
