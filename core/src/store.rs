//! Storage traits for the attendance engine.
//!
//! Two seams, combined under one umbrella trait:
//!
//! - [`FactStore`]: append-only persistence of attendance facts keyed by
//!   registration, with ordered retrieval and most-recent-fact lookup.
//! - [`Directory`]: the read side the scan handler and aggregation layer
//!   need: resolving a registration by its code, rosters by event or
//!   user, and the attendee/event lookups behind them.
//!
//! # Implementations
//!
//! - `PostgresAttendanceStore` (in `attendance-postgres`): production
//! - `InMemoryAttendanceStore` (in `attendance-testing`): fast, deterministic
//!
//! # Dyn Compatibility
//!
//! Both traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn AttendanceStore>`),
//! which is how the engine holds its storage backend.

use crate::fact::AttendanceFact;
use crate::registration::{
    Attendee, EventId, EventSummary, Registration, RegistrationCode, RegistrationId, UserId,
};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future alias used by the store traits.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors that can occur during store operations.
///
/// Domain-level misses (an unknown code, an unknown event) are modelled as
/// `Ok(None)` on the lookup methods, not as errors; these variants cover
/// genuine persistence failures, which abort the enclosing operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error (corrupt stored row).
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A uniqueness constraint was violated on insert.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Append-only storage of attendance facts keyed by registration.
///
/// Facts are immutable once appended. Implementations must preserve a
/// total order per registration: `load_facts` returns facts ascending by
/// recorded time (ties broken by append order), and `last_fact` returns
/// the maximum of that order.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the engine shares one store
/// across concurrently handled scans. Serialization of writes *per
/// registration* is the lock gateway's job, not the store's.
pub trait FactStore: Send + Sync {
    /// Append a fact to its registration's stream.
    fn append_fact(&self, fact: AttendanceFact) -> StoreFuture<'_, ()>;

    /// Load all facts for a registration, ordered ascending by recorded time.
    ///
    /// A registration with no facts yields an empty vector, not an error.
    fn load_facts(&self, registration_id: RegistrationId)
    -> StoreFuture<'_, Vec<AttendanceFact>>;

    /// The most recent fact for a registration, if any.
    fn last_fact(
        &self,
        registration_id: RegistrationId,
    ) -> StoreFuture<'_, Option<AttendanceFact>>;
}

/// Read-side directory of registrations, attendees, and events.
///
/// Everything the scan handler and the aggregation layer need beyond the
/// fact log itself. Registrations are written exactly once (by the
/// registration workflow) and never mutated.
pub trait Directory: Send + Sync {
    /// Resolve a registration by its opaque code (the QR payload).
    fn registration_by_code(
        &self,
        code: RegistrationCode,
    ) -> StoreFuture<'_, Option<Registration>>;

    /// Look up a registration by id.
    fn registration(&self, id: RegistrationId) -> StoreFuture<'_, Option<Registration>>;

    /// All registrations for an event.
    fn registrations_for_event(&self, event_id: EventId)
    -> StoreFuture<'_, Vec<Registration>>;

    /// All registrations for a user.
    fn registrations_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Registration>>;

    /// Whether a registration already exists for this user/event pair.
    fn registration_exists(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> StoreFuture<'_, bool>;

    /// Persist a new registration.
    ///
    /// Fails with [`StoreError::Constraint`] if the `(user, event)` pair or
    /// the code is already taken.
    fn insert_registration(&self, registration: Registration) -> StoreFuture<'_, ()>;

    /// Look up an attendee by id.
    fn attendee(&self, id: UserId) -> StoreFuture<'_, Option<Attendee>>;

    /// Look up an attendee by email.
    fn attendee_by_email(&self, email: String) -> StoreFuture<'_, Option<Attendee>>;

    /// Look up an event by id.
    fn event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>>;
}

/// Umbrella trait for a complete attendance storage backend.
///
/// Blanket-implemented for anything that is both a [`FactStore`] and a
/// [`Directory`], so the engine can hold a single `Arc<dyn AttendanceStore>`.
pub trait AttendanceStore: FactStore + Directory {}

impl<S: FactStore + Directory> AttendanceStore for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_display() {
        let error = StoreError::Database("connection refused".to_string());
        assert!(format!("{error}").contains("connection refused"));
    }

    #[test]
    fn constraint_error_display() {
        let error = StoreError::Constraint("registrations_user_event_key".to_string());
        let display = format!("{error}");
        assert!(display.starts_with("Constraint violation"));
    }
}
