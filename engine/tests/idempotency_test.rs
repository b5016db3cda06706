#![allow(clippy::expect_used)]

//! Duplicate scan submissions: at most one fact per idempotency key.

use attendance_core::fact::FactKind;
use attendance_core::registration::{
    Attendee, EventId, EventSummary, Registration, RegistrationCode, UserId,
};
use attendance_engine::AttendanceEngine;
use attendance_testing::{InMemoryAttendanceStore, ManualClock, test_clock};
use chrono::Duration;
use std::sync::Arc;

struct Fixture {
    engine: AttendanceEngine,
    store: Arc<InMemoryAttendanceStore>,
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
        engine: AttendanceEngine::new(store.clone(), clock.clone()),
        store,
        clock,
        code,
        registration,
    }
}

#[tokio::test]
async fn resubmission_with_same_key_appends_nothing() {
    let fx = fixture();

    let first = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-1"))
        .await
        .expect("scan should succeed");
    let second = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-1"))
        .await
        .expect("resubmission should succeed");

    assert_eq!(fx.store.fact_count(fx.registration.id), 1);
    // The second response is the first's, recomputed: same fact kind,
    // same status, same derived totals under an unmoved clock.
    assert_eq!(second.recorded, first.recorded);
    assert_eq!(second.status, first.status);
    assert_eq!(second.total_active_seconds, first.total_active_seconds);
    assert_eq!(second.credit_hours, first.credit_hours);
}

#[tokio::test]
async fn different_key_is_a_new_scan() {
    let fx = fixture();

    let first = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-1"))
        .await
        .expect("scan should succeed");
    let second = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-2"))
        .await
        .expect("scan should succeed");

    assert_eq!(fx.store.fact_count(fx.registration.id), 2);
    assert_eq!(first.recorded, FactKind::CheckIn);
    assert_eq!(second.recorded, FactKind::Pause);
}

#[tokio::test]
async fn missing_key_never_short_circuits() {
    let fx = fixture();

    let _ = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");
    let second = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");

    assert_eq!(fx.store.fact_count(fx.registration.id), 2);
    assert_eq!(second.recorded, FactKind::Pause);
}

#[tokio::test]
async fn key_only_matches_the_immediately_previous_fact() {
    let fx = fixture();

    let _ = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-1"))
        .await
        .expect("scan should succeed");
    let _ = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-2"))
        .await
        .expect("scan should succeed");

    // key-1 is no longer on the last fact: this is a fresh scan.
    let third = fx
        .engine
        .handle_scan(&fx.code, None, Some("key-1"))
        .await
        .expect("scan should succeed");
    assert_eq!(fx.store.fact_count(fx.registration.id), 3);
    assert_eq!(third.recorded, FactKind::Resume);
}

#[tokio::test]
async fn resubmitted_checkout_stays_checked_out() {
    let fx = fixture();

    let _ = fx
        .engine
        .handle_scan(&fx.code, None, None)
        .await
        .expect("scan should succeed");
    fx.clock.advance(Duration::seconds(3600));
    let checkout = fx
        .engine
        .handle_scan(&fx.code, Some("CHECKOUT"), Some("leave-1"))
        .await
        .expect("scan should succeed");
    let retried = fx
        .engine
        .handle_scan(&fx.code, Some("CHECKOUT"), Some("leave-1"))
        .await
        .expect("retry should succeed");

    // Without the key the retry would have toggled back to CHECKIN.
    assert_eq!(retried.recorded, FactKind::CheckOut);
    assert_eq!(retried.total_active_seconds, checkout.total_active_seconds);
    assert_eq!(fx.store.fact_count(fx.registration.id), 2);
}
