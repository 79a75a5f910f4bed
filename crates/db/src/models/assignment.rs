//! Per-day shift assignments.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::assignment::MAX_BATCH_ITEMS;
use rollcall_core::error::CoreError;
use rollcall_core::shift::ShiftWindow;
use rollcall_core::types::{DbId, MinuteOfDay, Timestamp};

const MAX_BATCH_ITEMS_U64: u64 = MAX_BATCH_ITEMS as u64;

/// A row from the `shift_assignments` table.
///
/// `shift_name`, `start_minutes` and `end_minutes` are copied from the shift
/// when the row is written; `shift_id` is nulled if the shift is deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShiftAssignment {
    pub id: DbId,
    pub user_id: DbId,
    pub shift_id: Option<DbId>,
    #[serde(rename = "date")]
    pub work_date: NaiveDate,
    pub shift_name: String,
    pub start_minutes: MinuteOfDay,
    pub end_minutes: MinuteOfDay,
    pub flexible: bool,
    pub mode: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShiftAssignment {
    pub fn window(&self) -> Result<ShiftWindow, CoreError> {
        ShiftWindow::new(self.start_minutes, self.end_minutes)
    }
}

/// DTO for the replace-on-key write of one `(user, date)` cell.
#[derive(Debug, Clone)]
pub struct UpsertAssignment {
    pub user_id: DbId,
    pub shift_id: DbId,
    pub work_date: NaiveDate,
    pub flexible: bool,
    pub mode: Option<String>,
    pub created_by: Option<DbId>,
}

/// One item of a bulk assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAssignItem {
    pub user_id: DbId,
    pub shift_id: DbId,
    pub date: NaiveDate,
    #[serde(default)]
    pub flexible: bool,
}

/// Request body for `POST /assignments/bulk`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkAssignRequest {
    #[validate(length(min = 1, max = MAX_BATCH_ITEMS_U64))]
    pub assignments: Vec<BulkAssignItem>,
    pub mode: Option<String>,
}

/// Request body for `POST /assignments/auto`.
///
/// `weekday_shifts` maps weekday (0 = Sunday .. 6 = Saturday) to a shift id.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AutoAssignRequest {
    #[validate(length(min = 1))]
    pub user_ids: Vec<DbId>,
    pub weekday_shifts: BTreeMap<u8, DbId>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub flexible: bool,
    pub mode: Option<String>,
}

/// Query parameters for `DELETE /assignments`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAssignmentParams {
    pub user_id: DbId,
    pub date: NaiveDate,
}
