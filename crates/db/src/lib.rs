//! PostgreSQL persistence for shifts, assignments and attendance.
//!
//! Models live in [`models`], queries in [`repositories`]. Every repository
//! is a zero-sized struct whose methods take `&PgPool` (or a connection
//! borrowed from a transaction) as the first argument.

pub mod models;
pub mod repositories;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgConnection;
use rollcall_core::types::DbId;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Advisory-lock key for one attendance day.
pub fn attendance_lock_key(user_id: DbId, date: NaiveDate) -> String {
    format!("attendance:{user_id}:{date}")
}

/// Serialize writers on `(user_id, date)` until the surrounding transaction
/// ends.
///
/// Must be called on a connection inside a transaction; the lock is released
/// on commit or rollback.
pub async fn lock_attendance_day(
    conn: &mut PgConnection,
    user_id: DbId,
    date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(attendance_lock_key(user_id, date))
        .execute(conn)
        .await?;
    Ok(())
}
