//! Integration tests for locked attendance event writes.

use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use rollcall_core::attendance_day::EventKind;
use rollcall_core::attendance_rules::{AttendanceFacts, AttendanceStatus};
use rollcall_core::validity::{EventValidity, InvalidReason};
use rollcall_db::models::attendance_log::{EventCapture, ShiftSnapshot};
use rollcall_db::models::user::CreateUser;
use rollcall_db::repositories::{AttendanceLogRepo, LogNoteRepo, UserRepo};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Night Worker".to_string(),
            email: "night@example.com".to_string(),
            role: "staff".to_string(),
            department: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn capture(hour: u32, minute: u32, day: u32, validity: EventValidity) -> EventCapture {
    EventCapture {
        at: Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap(),
        device_id: Some("phone-x".to_string()),
        latitude: Some(10.0),
        longitude: Some(106.0),
        location_id: None,
        photos: vec!["selfie.jpg".to_string()],
        validity,
    }
}

fn facts(status: AttendanceStatus, late: i32) -> AttendanceFacts {
    AttendanceFacts {
        late_minutes: late,
        early_minutes: 0,
        overtime_minutes: 0,
        is_holiday: false,
        holiday_overtime_rate: None,
        status,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_checkin_then_checkout_on_one_row(pool: PgPool) {
    let user = seed_user(&pool).await;
    let snapshot = ShiftSnapshot {
        shift_id: None,
        shift_name: Some("Night".to_string()),
        start_minutes: Some(1380),
        end_minutes: Some(360),
    };
    let invalid = EventValidity::from_reasons(vec![InvalidReason::UnapprovedDevice {
        device_id: "phone-x".to_string(),
    }]);

    let mut tx = pool.begin().await.unwrap();
    rollcall_db::lock_attendance_day(&mut tx, user, date("2024-06-01")).await.unwrap();
    let log = AttendanceLogRepo::insert_with_event(
        &mut tx,
        user,
        date("2024-06-01"),
        &snapshot,
        EventKind::Checkin,
        &capture(23, 30, 1, invalid.clone()),
        &facts(AttendanceStatus::Pending, 30),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert!(log.day_state().is_open());
    assert_matches!(
        log.checkin_validity.as_ref().map(|v| &v.0),
        Some(EventValidity::Invalid { reasons }) if reasons.len() == 1
    );
    assert!(log.has_invalid_event());
    assert_eq!(log.window().unwrap().end_effective(), 1800);

    let mut tx = pool.begin().await.unwrap();
    let existing = AttendanceLogRepo::find_for_day(&mut tx, user, date("2024-06-01"))
        .await
        .unwrap()
        .expect("log exists");
    let updated = AttendanceLogRepo::record_event(
        &mut tx,
        existing.id,
        EventKind::Checkout,
        &capture(6, 15, 2, EventValidity::Valid),
        &facts(AttendanceStatus::Completed, 30),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(updated.id, log.id);
    assert!(updated.day_state().is_completed());
    assert_eq!(updated.status, "completed");
    assert_eq!(updated.checkin_photos, vec!["selfie.jpg".to_string()]);

    let listed = AttendanceLogRepo::list_in_range(&pool, date("2024-06-01"), date("2024-06-02"), None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notes_attach_to_log(pool: PgPool) {
    let user = seed_user(&pool).await;
    let mut tx = pool.begin().await.unwrap();
    let log = AttendanceLogRepo::insert_with_event(
        &mut tx,
        user,
        date("2024-06-03"),
        &ShiftSnapshot::default(),
        EventKind::Checkin,
        &capture(8, 0, 3, EventValidity::Valid),
        &facts(AttendanceStatus::Pending, 0),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    LogNoteRepo::create(&pool, log.id, user, "Forgot to check out")
        .await
        .unwrap();
    let notes = LogNoteRepo::list_for_logs(&pool, &[log.id]).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].note, "Forgot to check out");
}
