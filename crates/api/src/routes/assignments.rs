//! Route definitions for shift assignments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/attendance/assignments`.
///
/// ```text
/// GET    /?start&end&user_ids   -> list_assignments
/// DELETE /?user_id&date         -> delete_assignment (manager)
/// POST   /bulk                  -> bulk_assign (manager)
/// POST   /auto                  -> auto_assign (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignments::list_assignments).delete(assignments::delete_assignment),
        )
        .route("/bulk", post(assignments::bulk_assign))
        .route("/auto", post(assignments::auto_assign))
}
