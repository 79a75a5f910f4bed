//! Shift templates.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::error::CoreError;
use rollcall_core::shift::{ShiftWindow, TimeOfDay, SHIFT_KIND_DAY};
use rollcall_core::types::{DbId, MinuteOfDay, Timestamp};

/// A row from the `shifts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shift {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_minutes: MinuteOfDay,
    pub end_minutes: MinuteOfDay,
    /// Departments the shift is offered to; empty means all.
    pub departments: Vec<String>,
    pub color: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shift {
    pub fn window(&self) -> Result<ShiftWindow, CoreError> {
        ShiftWindow::new(self.start_minutes, self.end_minutes)
    }
}

fn default_kind() -> String {
    SHIFT_KIND_DAY.to_string()
}

/// Request body for creating a shift. Times are minutes or `"HH:MM"`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShiftRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(alias = "start")]
    pub start_minutes: TimeOfDay,
    #[serde(alias = "end")]
    pub end_minutes: TimeOfDay,
    #[serde(default)]
    pub departments: Vec<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
}

/// Request body for updating a shift. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateShiftRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(alias = "start")]
    pub start_minutes: Option<TimeOfDay>,
    #[serde(alias = "end")]
    pub end_minutes: Option<TimeOfDay>,
    pub departments: Option<Vec<String>>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
}

/// DTO for inserting a shift with resolved minute values.
#[derive(Debug, Clone)]
pub struct CreateShift {
    pub name: String,
    pub kind: String,
    pub start_minutes: MinuteOfDay,
    pub end_minutes: MinuteOfDay,
    pub departments: Vec<String>,
    pub color: String,
    pub created_by: Option<DbId>,
}

/// DTO for patching a shift. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateShift {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub start_minutes: Option<MinuteOfDay>,
    pub end_minutes: Option<MinuteOfDay>,
    pub departments: Option<Vec<String>>,
    pub color: Option<String>,
}
