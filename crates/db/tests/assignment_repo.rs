//! Integration tests for replace-on-key assignment writes and the shift
//! delete guard.

use chrono::NaiveDate;
use sqlx::PgPool;
use rollcall_db::models::assignment::UpsertAssignment;
use rollcall_db::models::shift::CreateShift;
use rollcall_db::models::user::CreateUser;
use rollcall_db::repositories::shift_repo::ShiftDeletion;
use rollcall_db::repositories::{AssignmentRepo, ShiftRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.to_string(),
            email: email.to_string(),
            role: "staff".to_string(),
            department: Some("Ops".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_shift(pool: &PgPool, name: &str, start: i32, end: i32) -> i64 {
    ShiftRepo::create(
        pool,
        &CreateShift {
            name: name.to_string(),
            kind: "day".to_string(),
            start_minutes: start,
            end_minutes: end,
            departments: vec![],
            color: String::new(),
            created_by: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn upsert(user_id: i64, shift_id: i64, d: &str) -> UpsertAssignment {
    UpsertAssignment {
        user_id,
        shift_id,
        work_date: date(d),
        flexible: false,
        mode: None,
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reassigning_twice_leaves_one_row(pool: PgPool) {
    let user = seed_user(&pool, "u1@example.com").await;
    let a = seed_shift(&pool, "A", 480, 1020).await;
    let b = seed_shift(&pool, "B", 1380, 360).await;

    AssignmentRepo::upsert(&pool, &upsert(user, a, "2024-06-01")).await.unwrap();
    AssignmentRepo::upsert(&pool, &upsert(user, b, "2024-06-01")).await.unwrap();
    AssignmentRepo::upsert(&pool, &upsert(user, b, "2024-06-01")).await.unwrap();

    let rows = AssignmentRepo::list_in_range(&pool, date("2024-06-01"), date("2024-06-01"), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].shift_id, Some(b));
    assert_eq!(rows[0].shift_name, "B");
    assert_eq!(rows[0].start_minutes, 1380);
    assert_eq!(rows[0].end_minutes, 360);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_shift_writes_nothing(pool: PgPool) {
    let user = seed_user(&pool, "u2@example.com").await;
    let result = AssignmentRepo::upsert(&pool, &upsert(user, 9999, "2024-06-01"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_range_filter_by_users(pool: PgPool) {
    let u1 = seed_user(&pool, "a@example.com").await;
    let u2 = seed_user(&pool, "b@example.com").await;
    let shift = seed_shift(&pool, "Day", 480, 1020).await;
    for d in ["2024-06-01", "2024-06-02", "2024-06-05"] {
        AssignmentRepo::upsert(&pool, &upsert(u1, shift, d)).await.unwrap();
        AssignmentRepo::upsert(&pool, &upsert(u2, shift, d)).await.unwrap();
    }

    let rows = AssignmentRepo::list_in_range(
        &pool,
        date("2024-06-01"),
        date("2024-06-02"),
        Some(&[u2]),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.user_id == u2));

    let none = AssignmentRepo::list_in_range(&pool, date("2024-06-01"), date("2024-06-30"), Some(&[]))
        .await
        .unwrap();
    assert!(none.is_empty(), "an empty filter matches nobody");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_single_cell(pool: PgPool) {
    let user = seed_user(&pool, "c@example.com").await;
    let shift = seed_shift(&pool, "Day", 480, 1020).await;
    AssignmentRepo::upsert(&pool, &upsert(user, shift, "2024-06-01")).await.unwrap();

    assert!(AssignmentRepo::delete_for_day(&pool, user, date("2024-06-01")).await.unwrap());
    assert!(!AssignmentRepo::delete_for_day(&pool, user, date("2024-06-01")).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_shift_delete_guard(pool: PgPool) {
    let user = seed_user(&pool, "d@example.com").await;
    let shift = seed_shift(&pool, "Night", 1380, 360).await;
    AssignmentRepo::upsert(&pool, &upsert(user, shift, "2024-06-10")).await.unwrap();

    let blocked = ShiftRepo::delete_unless_scheduled(&pool, shift, date("2024-06-10"))
        .await
        .unwrap();
    assert_eq!(blocked, ShiftDeletion::InUse);

    // Once the only assignment is in the past the shift can go; the
    // assignment keeps its snapshot.
    let deleted = ShiftRepo::delete_unless_scheduled(&pool, shift, date("2024-06-11"))
        .await
        .unwrap();
    assert_eq!(deleted, ShiftDeletion::Deleted);

    let rows = AssignmentRepo::list_in_range(&pool, date("2024-06-10"), date("2024-06-10"), None)
        .await
        .unwrap();
    assert_eq!(rows[0].shift_id, None);
    assert_eq!(rows[0].shift_name, "Night");

    let missing = ShiftRepo::delete_unless_scheduled(&pool, shift, date("2024-06-11"))
        .await
        .unwrap();
    assert_eq!(missing, ShiftDeletion::NotFound);
}
