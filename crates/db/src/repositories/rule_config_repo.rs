//! Repository for the singleton `attendance_rules` row.

use sqlx::PgPool;
use rollcall_core::rule_config::AttendanceRules;
use rollcall_core::types::DbId;

use crate::models::rule_config::RuleConfig;

/// Column list for attendance_rules queries.
const COLUMNS: &str = "delay_tolerance_minutes, leave_early_tolerance_minutes, \
    allow_outside_location, allow_outside_device, holiday_overtime_rate, updated_by, updated_at";

/// Reads and writes the workspace's attendance rules.
pub struct RuleConfigRepo;

impl RuleConfigRepo {
    /// The current rules. The row is seeded by the migration.
    pub async fn get(pool: &PgPool) -> Result<RuleConfig, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance_rules WHERE id = 1");
        sqlx::query_as::<_, RuleConfig>(&query).fetch_one(pool).await
    }

    /// Overwrite the rules with a validated set.
    pub async fn update(
        pool: &PgPool,
        rules: &AttendanceRules,
        updated_by: DbId,
    ) -> Result<RuleConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_rules
                (id, delay_tolerance_minutes, leave_early_tolerance_minutes,
                 allow_outside_location, allow_outside_device, holiday_overtime_rate, updated_by)
             VALUES (1, $1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                delay_tolerance_minutes = EXCLUDED.delay_tolerance_minutes,
                leave_early_tolerance_minutes = EXCLUDED.leave_early_tolerance_minutes,
                allow_outside_location = EXCLUDED.allow_outside_location,
                allow_outside_device = EXCLUDED.allow_outside_device,
                holiday_overtime_rate = EXCLUDED.holiday_overtime_rate,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RuleConfig>(&query)
            .bind(rules.delay_tolerance_minutes)
            .bind(rules.leave_early_tolerance_minutes)
            .bind(rules.allow_outside_location)
            .bind(rules.allow_outside_device)
            .bind(rules.holiday_overtime_rate)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }
}
