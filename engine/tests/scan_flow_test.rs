#![allow(clippy::expect_used)]

//! End-to-end scan handling: toggle law, explicit actions, and the
//! duration derivation behind the response.

use attendance_core::fact::{AttendanceStatus, FactKind};
use attendance_core::registration::{
    Attendee, EventId, EventSummary, Registration, RegistrationCode, UserId,
};
use attendance_engine::{AttendanceEngine, AttendanceError};
use attendance_testing::{InMemoryAttendanceStore, ManualClock, test_clock};
use chrono::Duration;
use std::sync::Arc;

struct Fixture {
    engine: AttendanceEngine,
    clock: Arc<ManualClock>,
    code: RegistrationCode,
    registration: Registration,
}

fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::starting_at(test_clock().now_fixed()));
    let user = UserId::new();
    let event = EventId::new();
    let registration = Registration::new(user, event, test_clock().now_fixed());
    let code = registration.code.clone();

    let store = Arc::new(
        InMemoryAttendanceStore::new()
            .with_attendee(Attendee {
                id: user,
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
            })
            .with_event(EventSummary {
                id: event,
                name: "Systems Summit".to_string(),
                starts_at: test_clock().now_fixed(),
                ends_at: test_clock().now_fixed() + Duration::hours(8),
            })
            .with_registration(registration.clone()),
    );

    Fixture {
        engine: AttendanceEngine::new(store, clock.clone()),
        clock,
        code,
        registration,
    }
}

#[tokio::test]
async fn toggle_law_alternates_checkin_pause_resume() {
    let fx = fixture();

    let expected = [
        FactKind::CheckIn,
        FactKind::Pause,
        FactKind::Resume,
        FactKind::Pause,
        FactKind::Resume,
    ];
    for kind in expected {
        let outcome = fx
            .engine
            .handle_scan(&fx.code, None, None)
            .await
            .expect("scan should succeed");
        assert_eq!(outcome.recorded, kind);
    }
}

#[tokio::test]
async fn checkout_then_scan_re_enters() {
    let fx = fixture();

    let checkout = fx
        .engine
        .handle_scan(&fx.code, Some("CHECKOUT"), None)
        .await
        .expect("scan should succeed");
    assert_eq!(checkout.recorded, FactKind::CheckOut);
    assert_eq!(checkout.status, AttendanceStatus::CheckedOut);

    let re_entry = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");
    assert_eq!(re_entry.recorded, FactKind::CheckIn);
    assert_eq!(re_entry.status, AttendanceStatus::Active);
}

#[tokio::test]
async fn unknown_code_is_rejected() {
    let fx = fixture();
    let result = fx
        .engine
        .handle_scan(&RegistrationCode::new("no-such-code"), None, None)
        .await;
    assert!(matches!(
        result,
        Err(AttendanceError::RegistrationNotFound(_))
    ));
}

#[tokio::test]
async fn invalid_explicit_action_is_rejected() {
    let fx = fixture();
    let result = fx.engine.handle_scan(&fx.code, Some("LUNCH"), None).await;
    assert!(matches!(result, Err(AttendanceError::InvalidAction(_))));
}

#[tokio::test]
async fn scenario_derives_three_quarter_credit_hours() {
    // CHECKIN, +600s PAUSE, +300s RESUME, +1800s CHECKOUT:
    // active 600 + 1800 = 2400 s → 0.75 credit hours.
    let fx = fixture();

    let steps = [
        (FactKind::CheckIn, 600),
        (FactKind::Pause, 300),
        (FactKind::Resume, 1800),
        (FactKind::CheckOut, 0),
    ];
    let mut last = None;
    for (kind, advance_after) in steps {
        let outcome = fx
            .engine
            .handle_scan(&fx.code, None, None)
            .await
            .expect("scan should succeed");
        assert_eq!(outcome.recorded, kind);
        fx.clock.advance(Duration::seconds(advance_after));
        last = Some(outcome);
    }

    let outcome = last.expect("scans ran");
    assert_eq!(outcome.total_active_seconds, 2400);
    assert_eq!(outcome.credit_hours, 0.75);

    // The derivation is stable after checkout, however late we read it.
    fx.clock.advance(Duration::hours(6));
    let replayed = fx
        .engine
        .active_duration(fx.registration.id)
        .await
        .expect("duration should derive");
    assert_eq!(replayed, 2400);
}

#[tokio::test]
async fn open_session_counts_toward_running_total() {
    let fx = fixture();

    let checkin = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");
    assert_eq!(checkin.total_active_seconds, 0);

    fx.clock.advance(Duration::seconds(1000));
    let running = fx
        .engine
        .active_duration(fx.registration.id)
        .await
        .expect("duration should derive");
    assert_eq!(running, 1000);
}

#[tokio::test]
async fn short_attendance_earns_zero_credit() {
    let fx = fixture();

    let _ = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");
    fx.clock.advance(Duration::seconds(840));
    let outcome = fx
        .engine
        .handle_scan(&fx.code, Some("CHECKOUT"), None)
        .await
        .expect("scan should succeed");

    assert_eq!(outcome.total_active_seconds, 840);
    assert_eq!(outcome.credit_hours, 0.0);
}
