//! Explanatory notes an employee attaches to their own log.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use rollcall_core::forms::MAX_TEXT_LEN;
use rollcall_core::types::{DbId, Timestamp};

const MAX_TEXT_LEN_U64: u64 = MAX_TEXT_LEN as u64;

/// A row from the `log_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogNote {
    pub id: DbId,
    pub log_id: DbId,
    pub user_id: DbId,
    pub note: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /logs/notification`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLogNoteRequest {
    pub log_id: DbId,
    #[validate(length(min = 1, max = MAX_TEXT_LEN_U64))]
    pub note: String,
}
