//! Device registration and change requests.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::types::{DbId, Timestamp};

/// A row from the `device_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub old_device_id: Option<String>,
    pub old_device_name: Option<String>,
    pub old_device_type: Option<String>,
    pub new_device_id: String,
    pub new_device_name: Option<String>,
    pub new_device_type: Option<String>,
    pub require_gps: bool,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub requested_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /devices`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitDeviceRequest {
    #[validate(length(max = 255))]
    pub old_device_id: Option<String>,
    #[validate(length(max = 200))]
    pub old_device_name: Option<String>,
    #[validate(length(max = 100))]
    pub old_device_type: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub new_device_id: String,
    #[validate(length(max = 200))]
    pub new_device_name: Option<String>,
    #[validate(length(max = 100))]
    pub new_device_type: Option<String>,
    pub require_gps: Option<bool>,
}

/// DTO for inserting a device request on behalf of `user_id`.
#[derive(Debug, Clone)]
pub struct CreateDeviceRequest {
    pub user_id: DbId,
    pub old_device_id: Option<String>,
    pub old_device_name: Option<String>,
    pub old_device_type: Option<String>,
    pub new_device_id: String,
    pub new_device_name: Option<String>,
    pub new_device_type: Option<String>,
    pub require_gps: bool,
}

/// Request body for `PATCH /devices/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDeviceRequest {
    pub status: String,
}
