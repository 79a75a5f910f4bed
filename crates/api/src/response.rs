//! Success envelope shared by every handler.

use serde::Serialize;

/// `{ "data": ... }`. Errors use [`crate::error::AppError`] instead.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
