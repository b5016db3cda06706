//! Registrations and the read-side directory types.
//!
//! A registration binds one user to one event. It is created once by the
//! registration workflow, identified by an opaque unique code (the QR
//! payload), and never mutated by the core. Note the deliberate absence of
//! a status field: status is derived from the fact stream, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a registration (one per user/event pair).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random `RegistrationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RegistrationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a scheduled event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Registration code
// ============================================================================

/// Error type for [`RegistrationCode`] parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid registration code: {0}")]
pub struct ParseRegistrationCodeError(String);

/// The opaque, globally unique code bound to a registration.
///
/// This is the value encoded in the user's QR token and the sole key used
/// to resolve incoming scans. It is generated once at registration time
/// and immutable thereafter.
///
/// # Examples
///
/// ```
/// use attendance_core::registration::RegistrationCode;
///
/// let code = RegistrationCode::generate();
/// assert_eq!(code.as_str().len(), 32);
///
/// let parsed: RegistrationCode = "a1b2c3".parse().unwrap();
/// assert_eq!(parsed.as_str(), "a1b2c3");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationCode(String);

impl RegistrationCode {
    /// Create a code from a trusted string (storage round-trips).
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generate a fresh unique code (uuid v4, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegistrationCode {
    type Err = ParseRegistrationCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseRegistrationCodeError(
                "code cannot be empty".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for RegistrationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Entities
// ============================================================================

/// The binding between one user and one event.
///
/// Uniqueness is enforced on the `(user_id, event_id)` pair and on `code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Registration identity.
    pub id: RegistrationId,
    /// Owning user.
    pub user_id: UserId,
    /// Owning event.
    pub event_id: EventId,
    /// The QR payload; globally unique and immutable.
    pub code: RegistrationCode,
    /// When the registration was created.
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Create a new registration with a freshly generated code.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: RegistrationId::new(),
            user_id,
            event_id,
            code: RegistrationCode::generate(),
            created_at,
        }
    }
}

/// Read-side view of a user, as the aggregation layer needs it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// User identity.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address; unique, used as the dashboard lookup key.
    pub email: String,
}

/// Read-side view of a scheduled event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Event identity.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Scheduled end.
    pub ends_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_unique_and_simple_form() {
        let a = RegistrationCode::generate();
        let b = RegistrationCode::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(!a.as_str().contains('-'));
    }

    #[test]
    fn parse_empty_code_fails() {
        assert!("".parse::<RegistrationCode>().is_err());
    }

    #[test]
    fn new_registration_gets_fresh_identity() {
        let now = Utc::now();
        let user = UserId::new();
        let event = EventId::new();
        let a = Registration::new(user, event, now);
        let b = Registration::new(user, event, now);
        assert_ne!(a.id, b.id);
        assert_ne!(a.code, b.code);
        assert_eq!(a.user_id, b.user_id);
    }
}
