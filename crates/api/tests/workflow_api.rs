//! HTTP-level tests for device and form review workflows.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, patch_json, post_json, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn device_review_respects_department(pool: PgPool) {
    let ops_lead = seed_user(&pool, "ops@example.com", "manager", Some("Ops")).await;
    let sales_lead = seed_user(&pool, "sales@example.com", "manager", Some("Sales")).await;
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/attendance/devices",
        &staff.token,
        json!({ "new_device_id": "phone-1" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/attendance/devices/{id}/status");

    let response = patch_json(build_test_app(pool.clone()), &uri, &sales_lead.token, json!({ "status": "approved" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json(build_test_app(pool.clone()), &uri, &ops_lead.token, json!({ "status": "approved" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviewed = body_json(response).await["data"].clone();
    assert_eq!(reviewed["status"], "approved");
    assert_eq!(reviewed["reviewer_id"], ops_lead.id);

    // Approving twice is not a transition.
    let response = patch_json(build_test_app(pool.clone()), &uri, &ops_lead.token, json!({ "status": "approved" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A lost phone can be revoked later.
    let response = patch_json(build_test_app(pool.clone()), &uri, &ops_lead.token, json!({ "status": "rejected" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        build_test_app(pool),
        "/api/v1/attendance/devices?status=rejected",
        &staff.token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn leave_form_lifecycle(pool: PgPool) {
    let manager = seed_user(&pool, "lead@example.com", "manager", Some("Ops")).await;
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let other = seed_user(&pool, "other@example.com", "staff", Some("Ops")).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/attendance/forms",
        &staff.token,
        json!({ "type": "leave", "reason": "Family event", "start_date": "2024-06-10", "end_date": "2024-06-11" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let form = body_json(response).await["data"].clone();
    assert_eq!(form["status"], "pending");
    assert_eq!(form["type"], "leave");
    let uri = format!("/api/v1/attendance/forms/{}/status", form["id"]);

    // Other staff do not see it.
    let response = get(build_test_app(pool.clone()), "/api/v1/attendance/forms", &other.token).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = patch_json(build_test_app(pool.clone()), &uri, &staff.token, json!({ "status": "approved" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json(
        build_test_app(pool.clone()),
        &uri,
        &manager.token,
        json!({ "status": "approved", "note": "Enjoy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviewed = body_json(response).await["data"].clone();
    assert_eq!(reviewed["status"], "approved");
    assert_eq!(reviewed["review_note"], "Enjoy");

    let response = patch_json(build_test_app(pool), &uri, &manager.token, json!({ "status": "rejected" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn form_with_inverted_period_is_rejected(pool: PgPool) {
    let staff = seed_user(&pool, "staff@example.com", "staff", Some("Ops")).await;
    let response = post_json(
        build_test_app(pool),
        "/api/v1/attendance/forms",
        &staff.token,
        json!({ "type": "leave", "reason": "Trip", "start_date": "2024-06-11", "end_date": "2024-06-10" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
