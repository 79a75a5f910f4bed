//! Validity marker attached to every recorded check-in/check-out event.
//!
//! An event from an unapproved device or outside every allowed geofence is
//! still stored; it carries `Invalid` with the reasons so reports can show
//! the audit trail.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Why an event failed device or location checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidReason {
    /// No device identifier was sent.
    MissingDevice,
    /// The device is not in the user's approved set.
    UnapprovedDevice { device_id: String },
    /// No coordinates were sent.
    MissingLocation,
    /// The user has no location they are allowed to check in at.
    NoAllowedLocation,
    /// The point lies outside every allowed geofence.
    OutsideGeofence {
        /// Closest allowed location and its distance, if any was evaluated.
        nearest_location_id: Option<DbId>,
        distance_meters: Option<f64>,
    },
}

/// Outcome of device and location checks for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventValidity {
    Valid,
    Invalid { reasons: Vec<InvalidReason> },
}

impl EventValidity {
    /// Collapse a list of reasons into a marker (`Valid` when empty).
    pub fn from_reasons(reasons: Vec<InvalidReason>) -> Self {
        if reasons.is_empty() {
            EventValidity::Valid
        } else {
            EventValidity::Invalid { reasons }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, EventValidity::Valid)
    }

    /// The reasons, empty when valid.
    pub fn reasons(&self) -> &[InvalidReason] {
        match self {
            EventValidity::Valid => &[],
            EventValidity::Invalid { reasons } => reasons,
        }
    }
}
