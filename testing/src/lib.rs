//! # Attendance Testing
//!
//! Testing utilities for the attendance engine.
//!
//! This crate provides:
//! - Deterministic clock implementations ([`FixedClock`], [`ManualClock`])
//! - An in-memory [`AttendanceStore`](attendance_core::store::AttendanceStore)
//!   implementation with fixture builders ([`InMemoryAttendanceStore`])
//!
//! ## Example
//!
//! ```
//! use attendance_testing::{InMemoryAttendanceStore, ManualClock, test_clock};
//! use attendance_core::registration::{Attendee, UserId};
//!
//! let store = InMemoryAttendanceStore::new().with_attendee(Attendee {
//!     id: UserId::new(),
//!     name: "Ada Lovelace".to_string(),
//!     email: "ada@example.com".to_string(),
//! });
//! let clock = ManualClock::starting_at(test_clock().now_fixed());
//! ```

pub mod clock;
pub mod memory;

pub use clock::{FixedClock, ManualClock, test_clock};
pub use memory::InMemoryAttendanceStore;
