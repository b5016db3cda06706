//! Attendance facts: the immutable, append-only records of state-changing scans.
//!
//! A fact captures one scan (or one administrative action) against a
//! registration. Facts are never updated or deleted; every derived view
//! (current status, active time, credit hours) is recomputed from the
//! ordered fact sequence.

use crate::registration::RegistrationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error type for parsing an explicit scan action into a [`FactKind`].
///
/// Surfaced to the caller as the `InvalidAction` client error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid action: {0}")]
pub struct ParseFactKindError(pub String);

/// Discriminator for an attendance fact.
///
/// Five kinds, mirroring the scan vocabulary: a check-in starts attendance,
/// pause/resume bracket breaks, checkout ends attendance (but is
/// re-enterable), and `Manual` marks an administrative entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    /// Scanned to start attendance.
    CheckIn,
    /// Scanned to mark break start.
    Pause,
    /// Scanned to resume attendance.
    Resume,
    /// Scanned to end attendance.
    CheckOut,
    /// Administrative manual entry.
    Manual,
}

impl FactKind {
    /// The wire spelling of this kind (`"CHECKIN"`, `"PAUSE"`, ...).
    ///
    /// This is the form accepted by [`FromStr`] and persisted in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckIn => "CHECKIN",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
            Self::CheckOut => "CHECKOUT",
            Self::Manual => "MANUAL",
        }
    }

    /// Whether this kind opens an active session.
    #[must_use]
    pub const fn opens_session(self) -> bool {
        matches!(self, Self::CheckIn | Self::Resume)
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactKind {
    type Err = ParseFactKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECKIN" => Ok(Self::CheckIn),
            "PAUSE" => Ok(Self::Pause),
            "RESUME" => Ok(Self::Resume),
            "CHECKOUT" => Ok(Self::CheckOut),
            "MANUAL" => Ok(Self::Manual),
            other => Err(ParseFactKindError(other.to_string())),
        }
    }
}

/// Unique identifier for a single fact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactId(Uuid);

impl FactId {
    /// Creates a new random `FactId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `FactId` from a `Uuid`
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

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured metadata carried on a fact.
///
/// The persisted shape is a small JSON object. The core reads exactly two
/// fields: the optional caller-supplied `idempotency` key used to detect
/// duplicate scan submissions, and the `admin_bulk_checkout` marker the
/// bulk sweep stamps on the checkouts it appends. Everything else in a
/// stored blob is opaque and ignored.
///
/// # Examples
///
/// ```
/// use attendance_core::fact::FactMetadata;
///
/// let meta = FactMetadata::with_idempotency_key("scan-42");
/// assert_eq!(meta.idempotency_key.as_deref(), Some("scan-42"));
/// assert!(!meta.admin_bulk_checkout);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactMetadata {
    /// Caller-chosen opaque token for duplicate-submission detection.
    #[serde(rename = "idempotency", skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    /// Set on checkouts appended by the administrator bulk sweep.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub admin_bulk_checkout: bool,
}

impl FactMetadata {
    /// Metadata carrying only an idempotency key.
    #[must_use]
    pub fn with_idempotency_key(key: impl Into<String>) -> Self {
        Self {
            idempotency_key: Some(key.into()),
            admin_bulk_checkout: false,
        }
    }

    /// Metadata marking an administrator-initiated bulk checkout.
    #[must_use]
    pub const fn bulk_checkout() -> Self {
        Self {
            idempotency_key: None,
            admin_bulk_checkout: true,
        }
    }

    /// Whether this metadata carries nothing worth persisting.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.idempotency_key.is_none() && !self.admin_bulk_checkout
    }

    /// Best-effort parse of a stored metadata blob.
    ///
    /// Idempotency is best-effort, not a hard guarantee against malformed
    /// data: a missing or unparseable blob yields the empty metadata and
    /// never an error, so a corrupt stored value can only downgrade
    /// duplicate detection to "no match".
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_core::fact::FactMetadata;
    ///
    /// let meta = FactMetadata::parse_lossy(Some(r#"{"idempotency":"k1"}"#));
    /// assert_eq!(meta.idempotency_key.as_deref(), Some("k1"));
    ///
    /// let garbage = FactMetadata::parse_lossy(Some("not json"));
    /// assert_eq!(garbage, FactMetadata::default());
    /// ```
    #[must_use]
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        raw.and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    /// Serialize to the persisted JSON form, or `None` when empty.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        serde_json::to_string(self).ok()
    }
}

/// An immutable attendance fact.
///
/// Facts for a given registration are totally ordered by `recorded_at`
/// (server-assigned at append time); the per-registration lock guarantees
/// no two facts for the same registration are processed concurrently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFact {
    /// Unique fact identifier.
    pub id: FactId,
    /// The registration this fact belongs to.
    pub registration_id: RegistrationId,
    /// The fact discriminator.
    pub kind: FactKind,
    /// Server-assigned creation timestamp; the total order within a stream.
    pub recorded_at: DateTime<Utc>,
    /// Structured optional metadata.
    pub metadata: FactMetadata,
}

impl AttendanceFact {
    /// Create a new fact recorded at the given instant.
    #[must_use]
    pub fn new(
        registration_id: RegistrationId,
        kind: FactKind,
        recorded_at: DateTime<Utc>,
        metadata: FactMetadata,
    ) -> Self {
        Self {
            id: FactId::new(),
            registration_id,
            kind,
            recorded_at,
            metadata,
        }
    }
}

/// Derived status of a registration, computed from its last fact only.
///
/// There is deliberately no stored status field anywhere in the data model:
/// status is always a pure function of the fact sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Registered, no attendance activity yet (or last fact was manual).
    Registered,
    /// Currently attending (last fact was a check-in or resume).
    Active,
    /// On a break (last fact was a pause).
    Paused,
    /// Checked out (re-entry remains permitted).
    CheckedOut,
}

impl AttendanceStatus {
    /// Derive the status from the last fact kind, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_core::fact::{AttendanceStatus, FactKind};
    ///
    /// assert_eq!(AttendanceStatus::from_last(None), AttendanceStatus::Registered);
    /// assert_eq!(
    ///     AttendanceStatus::from_last(Some(FactKind::Resume)),
    ///     AttendanceStatus::Active,
    /// );
    /// ```
    #[must_use]
    pub const fn from_last(last: Option<FactKind>) -> Self {
        match last {
            Some(FactKind::CheckIn | FactKind::Resume) => Self::Active,
            Some(FactKind::Pause) => Self::Paused,
            Some(FactKind::CheckOut) => Self::CheckedOut,
            Some(FactKind::Manual) | None => Self::Registered,
        }
    }

    /// The wire spelling of this status (`"ACTIVE"`, `"PAUSED"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::CheckedOut => "CHECKED_OUT",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
