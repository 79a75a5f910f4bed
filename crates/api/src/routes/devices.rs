use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/attendance/devices`.
///
/// ```text
/// GET    /?status        -> list_devices
/// POST   /               -> submit_device
/// PATCH  /{id}/status    -> review_device (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list_devices).post(devices::submit_device))
        .route("/{id}/status", patch(devices::review_device))
}
