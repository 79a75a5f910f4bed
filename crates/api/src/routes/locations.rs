use axum::routing::{get, put};
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/attendance/locations`.
///
/// ```text
/// GET    /        -> list_locations
/// POST   /        -> create_location (manager)
/// PUT    /{id}    -> update_location (manager)
/// DELETE /{id}    -> delete_location (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/{id}",
            put(locations::update_location).delete(locations::delete_location),
        )
}
