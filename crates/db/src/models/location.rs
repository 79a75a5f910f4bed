//! Check-in locations with geofences.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::geofence::{GeoPoint, Geofence};
use rollcall_core::types::{DbId, Timestamp};

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub allowed_employees: Vec<DbId>,
    pub flexible_employees: Vec<DbId>,
    pub allowed_departments: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    pub fn geofence(&self) -> Geofence {
        Geofence {
            location_id: self.id,
            center: GeoPoint::new(self.latitude, self.longitude),
            radius_meters: self.radius_meters,
            allowed_employees: self.allowed_employees.clone(),
            flexible_employees: self.flexible_employees.clone(),
            allowed_departments: self.allowed_departments.clone(),
        }
    }
}

/// DTO for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub radius_meters: Option<f64>,
    #[serde(default)]
    pub allowed_employees: Vec<DbId>,
    #[serde(default)]
    pub flexible_employees: Vec<DbId>,
    #[serde(default)]
    pub allowed_departments: Vec<String>,
}

/// DTO for updating a location. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub radius_meters: Option<f64>,
    pub allowed_employees: Option<Vec<DbId>>,
    pub flexible_employees: Option<Vec<DbId>>,
    pub allowed_departments: Option<Vec<String>>,
}
