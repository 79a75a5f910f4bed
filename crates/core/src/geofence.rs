//! Circular geofences and location validity for attendance events.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::validity::InvalidReason;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default geofence radius for new locations, in meters.
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// Largest accepted geofence radius, in meters.
pub const MAX_RADIUS_METERS: f64 = 100_000.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two points, in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Validate latitude/longitude ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90 (got {latitude})"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180 (got {longitude})"
        )));
    }
    Ok(())
}

/// Validate a geofence radius (positive, bounded).
pub fn validate_radius(radius_meters: f64) -> Result<(), CoreError> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 || radius_meters > MAX_RADIUS_METERS {
        return Err(CoreError::Validation(format!(
            "radius_meters must be greater than 0 and at most {MAX_RADIUS_METERS} (got {radius_meters})"
        )));
    }
    Ok(())
}

/// The parts of a location the validity check needs.
#[derive(Debug, Clone)]
pub struct Geofence {
    pub location_id: DbId,
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub allowed_employees: Vec<DbId>,
    pub flexible_employees: Vec<DbId>,
    pub allowed_departments: Vec<String>,
}

impl Geofence {
    pub fn contains(&self, point: GeoPoint) -> bool {
        haversine_meters(self.center, point) <= self.radius_meters
    }

    fn assigned_to(&self, user_id: DbId, department: Option<&str>) -> bool {
        self.allowed_employees.contains(&user_id)
            || self.flexible_employees.contains(&user_id)
            || department.is_some_and(|d| self.allowed_departments.iter().any(|a| a == d))
    }
}

/// Locations a user may check in at.
///
/// A user listed as flexible at any location may use every location;
/// otherwise only locations assigning them directly or through their
/// department.
pub fn allowed_fences<'a>(
    user_id: DbId,
    department: Option<&str>,
    fences: &'a [Geofence],
) -> Vec<&'a Geofence> {
    if fences.iter().any(|f| f.flexible_employees.contains(&user_id)) {
        return fences.iter().collect();
    }
    fences
        .iter()
        .filter(|f| f.assigned_to(user_id, department))
        .collect()
}

/// Result of matching a point against a user's allowed fences.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCheck {
    /// The fence containing the point, closest first.
    pub matched_location_id: Option<DbId>,
    /// Reasons the location is invalid; empty when valid.
    pub reasons: Vec<InvalidReason>,
}

/// Check an event location against the user's allowed geofences.
///
/// When `allow_outside` is set no reason is ever produced, but the matching
/// fence (if any) is still reported.
pub fn check_location(
    user_id: DbId,
    department: Option<&str>,
    point: Option<GeoPoint>,
    fences: &[Geofence],
    allow_outside: bool,
) -> LocationCheck {
    let allowed = allowed_fences(user_id, department, fences);

    let Some(point) = point else {
        let reasons = if allow_outside {
            vec![]
        } else {
            vec![InvalidReason::MissingLocation]
        };
        return LocationCheck {
            matched_location_id: None,
            reasons,
        };
    };

    let nearest = allowed
        .iter()
        .map(|f| (f, haversine_meters(f.center, point)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let matched = allowed
        .iter()
        .filter(|f| f.contains(point))
        .min_by(|a, b| {
            haversine_meters(a.center, point).total_cmp(&haversine_meters(b.center, point))
        })
        .map(|f| f.location_id);

    let reasons = match (allow_outside, matched, nearest) {
        (true, _, _) | (false, Some(_), _) => vec![],
        (false, None, None) => vec![InvalidReason::NoAllowedLocation],
        (false, None, Some((fence, distance))) => vec![InvalidReason::OutsideGeofence {
            nearest_location_id: Some(fence.location_id),
            distance_meters: Some(distance.round()),
        }],
    };

    LocationCheck {
        matched_location_id: matched,
        reasons,
    }
}
