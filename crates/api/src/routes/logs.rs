//! Route definitions for attendance logs.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::logs;
use crate::state::AppState;

/// Routes mounted at `/attendance/logs`.
///
/// ```text
/// GET    /?start&end&user_id&user_ids  -> list_logs
/// POST   /checkin                      -> checkin
/// POST   /checkout                     -> checkout
/// POST   /notification                 -> add_note (log owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(logs::list_logs))
        .route("/checkin", post(logs::checkin))
        .route("/checkout", post(logs::checkout))
        .route("/notification", post(logs::add_note))
}
