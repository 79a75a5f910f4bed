//! Route definitions for the shift catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::shifts;
use crate::state::AppState;

/// Routes mounted at `/attendance/shifts`.
///
/// ```text
/// GET    /        -> list_shifts
/// POST   /        -> create_shift (manager)
/// GET    /{id}    -> get_shift
/// PUT    /{id}    -> update_shift (manager)
/// DELETE /{id}    -> delete_shift (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shifts::list_shifts).post(shifts::create_shift))
        .route(
            "/{id}",
            get(shifts::get_shift)
                .put(shifts::update_shift)
                .delete(shifts::delete_shift),
        )
}
