//! Repository for the `device_requests` table.

use sqlx::PgPool;
use rollcall_core::device::REQUEST_APPROVED;
use rollcall_core::types::DbId;

use crate::models::device_request::{CreateDeviceRequest, DeviceRequest};

/// Column list for device_requests queries.
const COLUMNS: &str = "id, user_id, old_device_id, old_device_name, old_device_type, \
    new_device_id, new_device_name, new_device_type, require_gps, status, reviewer_id, \
    requested_at, reviewed_at, created_at, updated_at";

/// Provides the device approval workflow's persistence.
pub struct DeviceRequestRepo;

impl DeviceRequestRepo {
    /// Insert a pending request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDeviceRequest,
    ) -> Result<DeviceRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_requests
                (user_id, old_device_id, old_device_name, old_device_type,
                 new_device_id, new_device_name, new_device_type, require_gps)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRequest>(&query)
            .bind(input.user_id)
            .bind(&input.old_device_id)
            .bind(&input.old_device_name)
            .bind(&input.old_device_type)
            .bind(&input.new_device_id)
            .bind(&input.new_device_name)
            .bind(&input.new_device_type)
            .bind(input.require_gps)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DeviceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_requests WHERE id = $1");
        sqlx::query_as::<_, DeviceRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Requests newest first, optionally filtered by users and status.
    pub async fn list(
        pool: &PgPool,
        user_ids: Option<&[DbId]>,
        status: Option<&str>,
    ) -> Result<Vec<DeviceRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM device_requests
             WHERE ($1::BIGINT[] IS NULL OR user_id = ANY($1))
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY requested_at DESC, id DESC"
        );
        sqlx::query_as::<_, DeviceRequest>(&query)
            .bind(user_ids)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Record a review decision, provided the request is still in `from`.
    ///
    /// Returns `None` if the request is missing or its status changed in
    /// the meantime.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
        reviewer_id: DbId,
    ) -> Result<Option<DeviceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE device_requests SET
                status = $3,
                reviewer_id = $4,
                reviewed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceRequest>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(reviewer_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's approved device whitelist.
    pub async fn approved_device_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT new_device_id FROM device_requests
             WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(REQUEST_APPROVED)
        .fetch_all(pool)
        .await
    }
}
