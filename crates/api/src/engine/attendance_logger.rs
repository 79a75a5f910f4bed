//! Check-in and check-out recording.
//!
//! Device and location checks run against data read before the
//! transaction; they only ever mark an event invalid, never reject it. The
//! log read, merge, rule recomputation and write happen inside one
//! transaction holding the advisory locks for the local date and the day
//! before it, taken in date order.

use chrono::Duration;
use rollcall_core::attendance_day::{
    plan_checkin, plan_checkout, resolve_checkin_date, resolve_checkout_date, EventAction,
    EventKind, PreviousDay,
};
use rollcall_core::attendance_rules::{reconcile, to_local, ReconcileInput};
use rollcall_core::device::check_device;
use rollcall_core::geofence::{check_location, GeoPoint, Geofence};
use rollcall_core::types::{DbId, Timestamp};
use rollcall_core::validity::EventValidity;
use rollcall_db::models::attendance_log::{AttendanceLog, EventCapture, ShiftSnapshot};
use rollcall_db::models::assignment::ShiftAssignment;
use rollcall_db::repositories::{
    AssignmentRepo, AttendanceLogRepo, DeviceRequestRepo, LocationRepo, RuleConfigRepo,
};

use crate::error::AppResult;
use crate::state::AppState;

/// One incoming event.
#[derive(Debug, Clone)]
pub struct AttendanceEvent {
    pub user_id: DbId,
    pub department: Option<String>,
    pub at: Timestamp,
    pub device_id: Option<String>,
    pub point: Option<GeoPoint>,
    pub photos: Vec<String>,
}

/// The stored log after an event, and what the event did to it.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub log: AttendanceLog,
    pub action: EventAction,
}

/// Record a check-in or check-out.
///
/// Fails with `Validation` only for a check-in on an already completed day.
pub async fn record(
    state: &AppState,
    kind: EventKind,
    event: AttendanceEvent,
) -> AppResult<RecordedEvent> {
    let pool = &state.pool;
    let rules = RuleConfigRepo::get(pool).await?.rules();

    let approved = DeviceRequestRepo::approved_device_ids(pool, event.user_id).await?;
    let fences: Vec<Geofence> = LocationRepo::list(pool)
        .await?
        .iter()
        .map(|l| l.geofence())
        .collect();

    let mut reasons = check_device(event.device_id.as_deref(), &approved, rules.allow_outside_device);
    let location = check_location(
        event.user_id,
        event.department.as_deref(),
        event.point,
        &fences,
        rules.allow_outside_location,
    );
    reasons.extend(location.reasons);
    let validity = EventValidity::from_reasons(reasons);

    let local = to_local(event.at, state.org_offset);
    let today = local.date();
    let yesterday = today - Duration::days(1);

    let mut tx = pool.begin().await?;
    rollcall_db::lock_attendance_day(&mut tx, event.user_id, yesterday).await?;
    rollcall_db::lock_attendance_day(&mut tx, event.user_id, today).await?;

    let previous_assignment = AssignmentRepo::find_for_day(&mut tx, event.user_id, yesterday).await?;
    let previous_log = AttendanceLogRepo::find_for_day(&mut tx, event.user_id, yesterday).await?;
    let today_log = AttendanceLogRepo::find_for_day(&mut tx, event.user_id, today).await?;
    let today_assignment = AssignmentRepo::find_for_day(&mut tx, event.user_id, today).await?;

    let previous = PreviousDay {
        window: previous_log
            .as_ref()
            .and_then(|l| l.window())
            .or_else(|| previous_assignment.as_ref().and_then(|a| a.window().ok())),
        log: previous_log.as_ref().map(|l| l.day_state()),
    };

    let work_date = match kind {
        EventKind::Checkin => resolve_checkin_date(local, &previous),
        EventKind::Checkout => resolve_checkout_date(
            local,
            today_log.as_ref().map(|l| l.day_state()),
            today_assignment.as_ref().and_then(|a| a.window().ok()),
            &previous,
        ),
    };
    let (existing, assignment) = if work_date == today {
        (today_log, today_assignment)
    } else {
        (previous_log, previous_assignment)
    };

    let existing_state = existing.as_ref().map(|l| l.day_state());
    let action = match kind {
        EventKind::Checkin => plan_checkin(existing_state)?,
        EventKind::Checkout => plan_checkout(existing_state),
    };

    // An existing log keeps the shift it was opened under.
    let snapshot = match &existing {
        Some(log) => log.snapshot(),
        None => snapshot_of(assignment.as_ref()),
    };

    let stored_local = |at: Option<Timestamp>| at.map(|t| to_local(t, state.org_offset));
    let (checkin, checkout) = match kind {
        EventKind::Checkin => (
            Some(local),
            stored_local(existing.as_ref().and_then(|l| l.checkout_at)),
        ),
        EventKind::Checkout => (
            stored_local(existing.as_ref().and_then(|l| l.checkin_at)),
            Some(local),
        ),
    };
    let facts = reconcile(
        &ReconcileInput {
            window: snapshot.window(),
            work_date,
            checkin,
            checkout,
        },
        &rules,
        state.holidays.as_ref(),
    );

    let capture = EventCapture {
        at: event.at,
        device_id: event.device_id,
        latitude: event.point.map(|p| p.latitude),
        longitude: event.point.map(|p| p.longitude),
        location_id: location.matched_location_id,
        photos: event.photos,
        validity,
    };

    let log = match existing {
        None => {
            AttendanceLogRepo::insert_with_event(
                &mut tx,
                event.user_id,
                work_date,
                &snapshot,
                kind,
                &capture,
                &facts,
            )
            .await?
        }
        Some(log) => AttendanceLogRepo::record_event(&mut tx, log.id, kind, &capture, &facts).await?,
    };
    tx.commit().await?;

    tracing::info!(
        user_id = event.user_id,
        log_id = log.id,
        date = %work_date,
        kind = kind.as_str(),
        action = ?action,
        valid = capture.validity.is_valid(),
        late_minutes = facts.late_minutes,
        status = facts.status.as_str(),
        "Attendance event recorded"
    );

    Ok(RecordedEvent { log, action })
}

fn snapshot_of(assignment: Option<&ShiftAssignment>) -> ShiftSnapshot {
    match assignment {
        Some(a) => ShiftSnapshot {
            shift_id: a.shift_id,
            shift_name: Some(a.shift_name.clone()),
            start_minutes: Some(a.start_minutes),
            end_minutes: Some(a.end_minutes),
        },
        None => ShiftSnapshot::default(),
    }
}
