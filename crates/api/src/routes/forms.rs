use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Routes mounted at `/attendance/forms`.
///
/// ```text
/// GET    /?status        -> list_forms
/// POST   /               -> submit_form
/// PATCH  /{id}/status    -> review_form (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list_forms).post(forms::submit_form))
        .route("/{id}/status", patch(forms::review_form))
}
