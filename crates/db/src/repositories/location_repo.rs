//! Repository for the `locations` table.

use sqlx::PgPool;
use rollcall_core::geofence::DEFAULT_RADIUS_METERS;
use rollcall_core::types::DbId;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list for locations queries.
const COLUMNS: &str = "id, name, latitude, longitude, radius_meters, allowed_employees, \
    flexible_employees, allowed_departments, created_at, updated_at";

/// Provides CRUD operations for check-in locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location. A missing radius uses the default.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (name, latitude, longitude, radius_meters,
                 allowed_employees, flexible_employees, allowed_departments)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS))
            .bind(&input.allowed_employees)
            .bind(&input.flexible_employees)
            .bind(&input.allowed_departments)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all locations ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY name ASC");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Patch a location. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                radius_meters = COALESCE($5, radius_meters),
                allowed_employees = COALESCE($6, allowed_employees),
                flexible_employees = COALESCE($7, flexible_employees),
                allowed_departments = COALESCE($8, allowed_departments),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.radius_meters)
            .bind(&input.allowed_employees)
            .bind(&input.flexible_employees)
            .bind(&input.allowed_departments)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location. Logs keep their coordinates; the location
    /// reference is nulled.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
