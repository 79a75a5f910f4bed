//! Repository for the `users` directory mirror.

use sqlx::PgPool;
use rollcall_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list for users queries.
const COLUMNS: &str = "id, name, email, role, department, is_active, created_at, updated_at";

/// Provides lookups over the user directory.
pub struct UserRepo;

impl UserRepo {
    /// Insert a directory entry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role, department)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.department)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Ids of active users in `department`, ascending.
    pub async fn department_members(
        pool: &PgPool,
        department: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM users
             WHERE department = $1 AND is_active
             ORDER BY id",
        )
        .bind(department)
        .fetch_all(pool)
        .await
    }

    /// The subset of `ids` that exist and are active.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM users WHERE id = ANY($1) AND is_active ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Active users, optionally restricted to `ids`, ordered by name.
    pub async fn list_active(
        pool: &PgPool,
        ids: Option<&[DbId]>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE is_active AND ($1::BIGINT[] IS NULL OR id = ANY($1))
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
