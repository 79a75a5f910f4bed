//! HTTP-level tests for the attendance summary report.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_shift, get, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn summary_merges_logs_and_unattended_schedule(pool: PgPool) {
    let admin = seed_user(&pool, "admin@example.com", "admin", None).await;
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let shift = create_shift(&pool, &admin.token, "Day", "08:00", "17:00").await;

    post_json(
        build_test_app(pool.clone()),
        "/api/v1/attendance/assignments/bulk",
        &admin.token,
        json!({ "assignments": [
            { "user_id": staff.id, "shift_id": shift, "date": "2024-06-03" },
            { "user_id": staff.id, "shift_id": shift, "date": "2024-06-04" },
        ] }),
    )
    .await;
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/attendance/logs/checkin",
        &admin.token,
        json!({ "user_id": staff.id, "timestamp": "2024-06-03T08:30:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        build_test_app(pool),
        &format!(
            "/api/v1/attendance/reports/summary?start=2024-06-03&end=2024-06-04&user_ids={}",
            staff.id
        ),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2024-06-04");
    assert_eq!(rows[0]["kind"], "not_checked_in");
    assert_eq!(rows[1]["kind"], "logged");
    assert_eq!(rows[1]["is_late"], true);
    assert_eq!(rows[1]["missing_checkout"], true);

    let totals = &report["users"][0];
    assert_eq!(totals["user_id"], staff.id);
    assert_eq!(totals["scheduled"], 2);
    assert_eq!(totals["worked"], 1);
    assert_eq!(totals["late"], 1);
    assert_eq!(totals["absent"], 1);

    let days = report["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["checked_in"], 1);
    assert_eq!(days[1]["absent"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unattended_holiday_is_flagged(pool: PgPool) {
    let admin = seed_user(&pool, "admin@example.com", "admin", None).await;
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let shift = create_shift(&pool, &admin.token, "Day", "08:00", "17:00").await;

    post_json(
        build_test_app(pool.clone()),
        "/api/v1/attendance/assignments/bulk",
        &admin.token,
        json!({ "assignments": [
            { "user_id": staff.id, "shift_id": shift, "date": "2024-09-02" },
            { "user_id": staff.id, "shift_id": shift, "date": "2024-09-04" },
        ] }),
    )
    .await;

    let response = get(
        build_test_app(pool),
        &format!(
            "/api/v1/attendance/reports/summary?start=2024-09-02&end=2024-09-04&user_ids={}",
            staff.id
        ),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await["data"].clone();

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2024-09-04");
    assert_eq!(rows[0]["is_holiday"], false);
    assert_eq!(rows[1]["date"], "2024-09-02");
    assert_eq!(rows[1]["is_holiday"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_summary_only_covers_self(pool: PgPool) {
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let other = seed_user(&pool, "other@example.com", "staff", Some("Ops")).await;

    let response = get(
        build_test_app(pool),
        &format!(
            "/api/v1/attendance/reports/summary?start=2024-06-01&end=2024-06-07&user_ids={}",
            other.id
        ),
        &staff.token,
    )
    .await;
    let report = body_json(response).await["data"].clone();
    let users = report["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["user_id"], staff.id);
    assert_eq!(report["days"].as_array().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inverted_range_is_rejected(pool: PgPool) {
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let response = get(
        build_test_app(pool),
        "/api/v1/attendance/reports/summary?start=2024-06-07&end=2024-06-01",
        &staff.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
