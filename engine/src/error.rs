//! Error taxonomy for the attendance engine.
//!
//! The first four variants are client errors (bad code, unknown event or
//! user, unparseable action, duplicate registration); `Store` covers
//! persistence failures, which abort the operation with no partial fact
//! written.

use attendance_core::fact::ParseFactKindError;
use attendance_core::registration::{EventId, RegistrationCode, RegistrationId};
use attendance_core::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the engine's operations.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// No registration matches the scanned code.
    #[error("Invalid code: {0}")]
    RegistrationNotFound(RegistrationCode),

    /// No registration with this id.
    #[error("Registration not found: {0}")]
    UnknownRegistration(RegistrationId),

    /// No event with this id.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// No user with this email.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// An explicit scan action did not parse to a fact kind.
    #[error(transparent)]
    InvalidAction(#[from] ParseFactKindError),

    /// The user is already registered for this event.
    #[error("Already registered for this event")]
    AlreadyRegistered,

    /// Persistence failure; the enclosing operation is aborted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttendanceError {
    /// Whether this error is the caller's fault (vs. a server failure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
