//! Deterministic clock implementations.

use attendance_core::environment::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Fixed clock for deterministic tests.
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use attendance_testing::FixedClock;
/// use attendance_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// let time1 = clock.now();
/// let time2 = clock.now();
/// assert_eq!(time1, time2); // Always the same!
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }

    /// The instant this clock is pinned at.
    #[must_use]
    pub const fn now_fixed(&self) -> DateTime<Utc> {
        self.time
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Advanceable clock for scenario tests.
///
/// Starts at a given instant and only moves when the test tells it to,
/// which makes elapsed-time assertions exact: check in, advance ten
/// minutes, pause, and the derived active time is exactly 600 seconds.
///
/// # Example
///
/// ```
/// use attendance_testing::ManualClock;
/// use attendance_core::environment::Clock;
/// use chrono::{Duration, Utc};
///
/// let clock = ManualClock::starting_at(Utc::now());
/// let t0 = clock.now();
/// clock.advance(Duration::seconds(600));
/// assert_eq!(clock.now() - t0, Duration::seconds(600));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    time: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a manual clock starting at the given instant.
    #[must_use]
    pub fn starting_at(time: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        let mut guard = self
            .time
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .time
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}
