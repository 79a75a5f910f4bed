pub mod assignments;
pub mod devices;
pub mod forms;
pub mod health;
pub mod locations;
pub mod logs;
pub mod reports;
pub mod rules;
pub mod shifts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /attendance/shifts                          list, create
/// /attendance/shifts/{id}                     get, update, delete
///
/// /attendance/assignments                     list (?start&end&user_ids), clear cell (DELETE ?user_id&date)
/// /attendance/assignments/bulk                bulk upsert (POST)
/// /attendance/assignments/auto                weekday-pattern upsert (POST)
///
/// /attendance/locations                       list, create
/// /attendance/locations/{id}                  update, delete
///
/// /attendance/devices                         list (?status), submit
/// /attendance/devices/{id}/status             review (PATCH)
///
/// /attendance/logs                            list (?start&end&user_id&user_ids)
/// /attendance/logs/checkin                    check in (POST)
/// /attendance/logs/checkout                   check out (POST)
/// /attendance/logs/notification               attach note (POST)
///
/// /attendance/rules                           get, update
///
/// /attendance/reports/summary                 range summary (GET)
///
/// /attendance/forms                           list (?status), submit
/// /attendance/forms/{id}/status               review (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/attendance", attendance_routes())
}

fn attendance_routes() -> Router<AppState> {
    Router::new()
        .nest("/shifts", shifts::router())
        .nest("/assignments", assignments::router())
        .nest("/locations", locations::router())
        .nest("/devices", devices::router())
        .nest("/logs", logs::router())
        .nest("/rules", rules::router())
        .nest("/reports", reports::router())
        .nest("/forms", forms::router())
}
