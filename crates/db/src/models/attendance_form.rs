//! Attendance request forms (leave, device change, other).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::forms::MAX_TEXT_LEN;
use rollcall_core::types::{DbId, Timestamp};

const MAX_TEXT_LEN_U64: u64 = MAX_TEXT_LEN as u64;

/// A row from the `attendance_forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceForm {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub form_type: String,
    pub reason: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub review_note: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /forms`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitForm {
    #[serde(rename = "type")]
    pub form_type: String,
    #[validate(length(min = 1, max = MAX_TEXT_LEN_U64))]
    pub reason: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for inserting a form for `user_id`.
#[derive(Debug, Clone)]
pub struct CreateAttendanceForm {
    pub user_id: DbId,
    pub form_type: String,
    pub reason: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request body for `PATCH /forms/{id}/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewForm {
    pub status: String,
    #[validate(length(max = MAX_TEXT_LEN_U64))]
    pub note: Option<String>,
}
