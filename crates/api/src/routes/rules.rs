use axum::routing::get;
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

/// Routes mounted at `/attendance/rules`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(rules::get_rules).put(rules::update_rules))
}
