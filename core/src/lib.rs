//! # Attendance Core
//!
//! Core domain types and derivation logic for the attendance engine.
//!
//! This crate provides the fundamental abstractions for tracking physical
//! attendance at scheduled events through QR-code scans. Scans record
//! discrete, immutable facts (`CHECKIN`, `PAUSE`, `RESUME`, `CHECKOUT`,
//! `MANUAL`) against a per-user event registration, and every derived value
//! (current status, total active time, credit hours) is recomputed from
//! the ordered fact stream on read.
//!
//! ## Core Concepts
//!
//! - **Fact**: an immutable record of a single state-changing scan
//!   ([`fact::AttendanceFact`])
//! - **Registration**: the binding between one user and one event,
//!   identified by an opaque code used as the QR payload
//!   ([`registration::Registration`])
//! - **Transition resolver**: the pure toggle state machine deciding the
//!   next fact kind ([`transition::resolve_next_kind`])
//! - **Replay calculator**: session replay over a fact sequence producing
//!   active seconds and credit hours ([`replay`])
//! - **Store traits**: append-only fact log and read-side directory,
//!   implemented in-memory (testing) and on PostgreSQL (production)
//!   ([`store`])
//!
//! ## Architecture Principles
//!
//! - Derived state is a pure function of the fact stream; no stored status
//!   field is ever trusted.
//! - Facts are append-only and totally ordered per registration.
//! - All external dependencies (clock, storage) are abstracted behind
//!   traits and injected.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod fact;
pub mod registration;
pub mod replay;
pub mod store;
pub mod transition;

/// Environment module - dependency injection traits.
///
/// The only ambient dependency the core logic needs is time: the duration
/// calculator counts an open tail session up to "now", and the scan handler
/// stamps facts with a server-assigned timestamp. Abstracting the clock
/// keeps both deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let now = clock.now();
    /// assert!(now <= clock.now());
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time.
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::environment::{Clock, SystemClock};

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(a <= b);
    }
}
