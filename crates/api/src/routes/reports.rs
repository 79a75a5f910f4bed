use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/attendance/reports`.
///
/// ```text
/// GET    /summary?start&end&user_ids   -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(reports::summary))
}
