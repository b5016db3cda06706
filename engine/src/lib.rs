//! # Attendance Engine
//!
//! The attendance event engine: scan ingestion with idempotency and
//! per-registration locking, plus the aggregate read paths built on the
//! same fact-replay derivation.
//!
//! ## Control flow for a scan
//!
//! ```text
//! handle_scan
//!   → resolve registration by code
//!   → acquire per-registration lock        (LockGateway)
//!   → check last fact's idempotency key    (short-circuit on match)
//!   → resolve next fact kind               (toggle state machine)
//!   → append fact
//!   → recompute active time / credit hours (replay)
//!   → lock released on return
//! ```
//!
//! Two scans for different registrations proceed fully in parallel; two
//! scans for the same registration are strictly serialized by the lock
//! gateway, so "read last fact, decide, append" is atomic per registration.
//!
//! ## Example
//!
//! ```
//! use attendance_engine::AttendanceEngine;
//! use attendance_core::registration::{Attendee, EventSummary, EventId, Registration, UserId};
//! use attendance_testing::{InMemoryAttendanceStore, test_clock};
//! use chrono::{Duration, Utc};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), attendance_engine::AttendanceError> {
//! let user = UserId::new();
//! let event = EventId::new();
//! let registration = Registration::new(user, event, Utc::now());
//! let code = registration.code.clone();
//!
//! let store = InMemoryAttendanceStore::new()
//!     .with_attendee(Attendee {
//!         id: user,
//!         name: "Ada Lovelace".to_string(),
//!         email: "ada@example.com".to_string(),
//!     })
//!     .with_event(EventSummary {
//!         id: event,
//!         name: "RustConf".to_string(),
//!         starts_at: Utc::now(),
//!         ends_at: Utc::now() + Duration::hours(8),
//!     })
//!     .with_registration(registration);
//!
//! let engine = AttendanceEngine::new(Arc::new(store), Arc::new(test_clock()));
//! let outcome = engine.handle_scan(&code, None, None).await?;
//! assert_eq!(outcome.recorded.as_str(), "CHECKIN");
//! # Ok(())
//! # }
//! ```

pub mod dashboard;
pub mod error;
pub mod lock;
pub mod registry;
pub mod roster;
pub mod scan;
pub mod sweep;

pub use dashboard::{ActivityEntry, DashboardStats};
pub use error::AttendanceError;
pub use lock::LockGateway;
pub use roster::AttendeeRecord;
pub use scan::{AttendanceEngine, ScanOutcome};
pub use sweep::BulkCheckoutReport;
