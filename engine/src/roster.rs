//! The event attendee roster: per-registration derived views for one event.

use crate::error::AttendanceError;
use crate::scan::AttendanceEngine;
use attendance_core::fact::{AttendanceStatus, FactKind};
use attendance_core::registration::{EventId, RegistrationCode, RegistrationId, UserId};
use attendance_core::replay::{credit_hours, total_active_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One roster row: a registration with its derived attendance view.
#[derive(Clone, Debug, Serialize)]
pub struct AttendeeRecord {
    /// Registration identity.
    pub registration_id: RegistrationId,
    /// Owning user.
    pub user_id: UserId,
    /// User display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// The registration's QR code payload.
    pub code: RegistrationCode,
    /// Status derived from the last fact.
    pub status: AttendanceStatus,
    /// Last fact's timestamp, or the registration's creation time when no
    /// facts exist yet.
    pub last_activity: DateTime<Utc>,
    /// Credit hours derived by replay.
    pub credit_hours: f64,
    /// The last fact's kind, if any facts exist.
    pub last_action: Option<FactKind>,
}

impl AttendanceEngine {
    /// The attendee roster for one event.
    ///
    /// For every registration on the event: derived status, last activity,
    /// last action, and credit hours, all recomputed from the fact stream.
    /// This is a lock-free read path; it observes a consistent snapshot
    /// per registration and never blocks live scans.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::EventNotFound`]: unknown event
    /// - [`AttendanceError::Store`]: persistence failure
    pub async fn event_attendees(
        &self,
        event_id: EventId,
    ) -> Result<Vec<AttendeeRecord>, AttendanceError> {
        self.store()
            .event(event_id)
            .await?
            .ok_or(AttendanceError::EventNotFound(event_id))?;

        let registrations = self.store().registrations_for_event(event_id).await?;
        let now = self.clock().now();

        let mut roster = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let attendee = self
                .store()
                .attendee(registration.user_id)
                .await?
                .ok_or_else(|| {
                    AttendanceError::UserNotFound(registration.user_id.to_string())
                })?;

            let facts = self.store().load_facts(registration.id).await?;
            let total = total_active_seconds(&facts, now);
            let last = facts.last();

            roster.push(AttendeeRecord {
                registration_id: registration.id,
                user_id: attendee.id,
                name: attendee.name,
                email: attendee.email,
                code: registration.code,
                status: AttendanceStatus::from_last(last.map(|fact| fact.kind)),
                last_activity: last.map_or(registration.created_at, |fact| fact.recorded_at),
                credit_hours: credit_hours(total),
                last_action: last.map(|fact| fact.kind),
            });
        }

        Ok(roster)
    }
}
