//! The scan handler: ingesting one QR scan as one attendance fact.
//!
//! A scan resolves the registration by code, serializes against other
//! scans for the same registration, filters duplicate submissions by
//! idempotency key, resolves the next fact kind, appends it, and derives
//! the response totals by replaying the stream. All derived values are
//! recomputed from facts on every call; nothing cached is ever trusted.

use crate::error::AttendanceError;
use crate::lock::LockGateway;
use attendance_core::environment::Clock;
use attendance_core::fact::{AttendanceFact, AttendanceStatus, FactKind, FactMetadata};
use attendance_core::registration::{Registration, RegistrationCode, RegistrationId};
use attendance_core::replay::{credit_hours, total_active_seconds};
use attendance_core::store::AttendanceStore;
use attendance_core::transition::resolve_next_kind;
use serde::Serialize;
use std::sync::Arc;

/// Result of one handled scan (or of an idempotent resubmission).
#[derive(Clone, Debug, Serialize)]
pub struct ScanOutcome {
    /// The registration the scan applied to.
    pub registration_id: RegistrationId,
    /// The kind of the fact this scan recorded (or, for an idempotent
    /// resubmission, the kind of the fact the original submission recorded).
    pub recorded: FactKind,
    /// Status derived from the stream after this scan.
    pub status: AttendanceStatus,
    /// Total active seconds derived by replay, open tail included.
    pub total_active_seconds: i64,
    /// Credit hours derived from the total (quarter-hour rounding,
    /// 15-minute floor).
    pub credit_hours: f64,
}

/// The attendance event engine.
///
/// Owns the lock gateway and holds the storage backend and clock behind
/// trait objects; all operations (scan handling, the roster, the bulk
/// sweep, the dashboards) run against the same fact-replay derivation.
pub struct AttendanceEngine {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    locks: LockGateway,
}

impl AttendanceEngine {
    /// Create an engine over a storage backend and clock.
    #[must_use]
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: LockGateway::new(),
        }
    }

    pub(crate) fn store(&self) -> &dyn AttendanceStore {
        self.store.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) const fn locks(&self) -> &LockGateway {
        &self.locks
    }

    /// Handle one QR scan.
    ///
    /// `action`, when supplied, must be one of the wire spellings
    /// (`"CHECKIN"`, `"PAUSE"`, `"RESUME"`, `"CHECKOUT"`, `"MANUAL"`);
    /// otherwise the toggle rule decides against the last fact.
    /// `idempotency_key`, when supplied and equal to the key stored on the
    /// last fact, short-circuits: no new fact is appended and the response
    /// is recomputed as if the resubmitted scan had succeeded.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::RegistrationNotFound`]: unknown code
    /// - [`AttendanceError::InvalidAction`]: unparseable explicit action
    /// - [`AttendanceError::Store`]: persistence failure (nothing written)
    #[tracing::instrument(skip(self), fields(code = %code))]
    pub async fn handle_scan(
        &self,
        code: &RegistrationCode,
        action: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> Result<ScanOutcome, AttendanceError> {
        // The registration row is immutable, so resolving the code before
        // taking the lock cannot race with a concurrent scan.
        let registration = self
            .store
            .registration_by_code(code.clone())
            .await?
            .ok_or_else(|| AttendanceError::RegistrationNotFound(code.clone()))?;

        let _guard = self.locks.acquire(registration.id).await;

        let last = self.store.last_fact(registration.id).await?;

        // Idempotency filter: a resubmission of the scan that produced the
        // last fact returns that fact's result without appending.
        if let (Some(last_fact), Some(key)) = (&last, idempotency_key) {
            if last_fact.metadata.idempotency_key.as_deref() == Some(key) {
                tracing::debug!(
                    registration_id = %registration.id,
                    idempotency_key = key,
                    "duplicate scan submission, returning previous result"
                );
                return self.outcome(&registration, last_fact.kind).await;
            }
        }

        let kind = resolve_next_kind(last.map(|fact| fact.kind), action)?;
        let metadata = idempotency_key.map_or_else(FactMetadata::default, |key| {
            FactMetadata::with_idempotency_key(key)
        });
        let fact = AttendanceFact::new(registration.id, kind, self.clock.now(), metadata);

        self.store.append_fact(fact).await?;
        tracing::info!(
            registration_id = %registration.id,
            kind = %kind,
            "recorded attendance fact"
        );

        self.outcome(&registration, kind).await
    }

    /// Total active seconds for a registration, derived by replay.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::RegistrationNotFound`]: unknown registration
    /// - [`AttendanceError::Store`]: persistence failure
    pub async fn active_duration(
        &self,
        registration_id: RegistrationId,
    ) -> Result<i64, AttendanceError> {
        let registration = self
            .store
            .registration(registration_id)
            .await?
            .ok_or(AttendanceError::UnknownRegistration(registration_id))?;
        let facts = self.store.load_facts(registration.id).await?;
        Ok(total_active_seconds(&facts, self.clock.now()))
    }

    async fn outcome(
        &self,
        registration: &Registration,
        recorded: FactKind,
    ) -> Result<ScanOutcome, AttendanceError> {
        let facts = self.store.load_facts(registration.id).await?;
        let total = total_active_seconds(&facts, self.clock.now());
        Ok(ScanOutcome {
            registration_id: registration.id,
            recorded,
            status: AttendanceStatus::from_last(Some(recorded)),
            total_active_seconds: total,
            credit_hours: credit_hours(total),
        })
    }
}
