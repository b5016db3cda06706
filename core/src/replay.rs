//! The duration/credit calculator: pure replay over a fact sequence.
//!
//! Total active time is derived by replaying a registration's facts in
//! ascending timestamp order and summing the open intervals between
//! start-type facts (`CHECKIN`/`RESUME`) and the next close-type fact
//! (`PAUSE`/`CHECKOUT`/`MANUAL`). A session still open at the end of the
//! stream counts up to `now`, so an in-progress attendance contributes to
//! the running total at read time.
//!
//! The derivation is read-only and idempotent: replaying the same ordered
//! sequence with the same `now` always yields the same total.

use crate::fact::AttendanceFact;
use chrono::{DateTime, Utc};

/// Seconds below which no credit is granted (15 minutes).
pub const MIN_CREDITABLE_SECONDS: i64 = 15 * 60;

/// Compute total active seconds for an ordered fact sequence.
///
/// `facts` must be ordered ascending by `recorded_at`; `now` bounds a
/// session left open by the stream (a user who never checked out).
///
/// A start-type fact never resets an already-open session, which guards the
/// total against duplicate `CHECKIN` facts in the stream.
///
/// # Examples
///
/// ```
/// use attendance_core::fact::{AttendanceFact, FactKind, FactMetadata};
/// use attendance_core::registration::RegistrationId;
/// use attendance_core::replay::total_active_seconds;
/// use chrono::{Duration, Utc};
///
/// let reg = RegistrationId::new();
/// let t0 = Utc::now();
/// let fact = |kind, offset| {
///     AttendanceFact::new(reg, kind, t0 + Duration::seconds(offset), FactMetadata::default())
/// };
///
/// let facts = vec![
///     fact(FactKind::CheckIn, 0),
///     fact(FactKind::Pause, 600),
///     fact(FactKind::Resume, 900),
///     fact(FactKind::CheckOut, 2700),
/// ];
/// assert_eq!(total_active_seconds(&facts, t0 + Duration::seconds(9999)), 2400);
/// ```
#[must_use]
pub fn total_active_seconds(facts: &[AttendanceFact], now: DateTime<Utc>) -> i64 {
    let mut session_start: Option<DateTime<Utc>> = None;
    let mut total = 0_i64;

    for fact in facts {
        if fact.kind.opens_session() {
            if session_start.is_none() {
                session_start = Some(fact.recorded_at);
            }
        } else if let Some(start) = session_start.take() {
            total += (fact.recorded_at - start).num_seconds();
        }
    }

    // Still active: the open tail session counts until now.
    if let Some(start) = session_start {
        total += (now - start).num_seconds();
    }

    total
}

/// Convert total active seconds to credit hours.
///
/// Totals below the 15-minute floor earn zero credit; everything else is
/// rounded to the nearest quarter hour (round-half-up on `hours × 4`).
///
/// # Examples
///
/// ```
/// use attendance_core::replay::credit_hours;
///
/// assert_eq!(credit_hours(840), 0.0);    // 14 min: below the floor
/// assert_eq!(credit_hours(1000), 0.25);  // ~16.7 min
/// assert_eq!(credit_hours(5400), 1.5);   // 1.5 h exactly
/// ```
#[must_use]
pub fn credit_hours(total_seconds: i64) -> f64 {
    if total_seconds < MIN_CREDITABLE_SECONDS {
        return 0.0;
    }
    let hours = total_seconds as f64 / 3600.0;
    (hours * 4.0).round() / 4.0
}
