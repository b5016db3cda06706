//! The registration workflow: binding a user to an event.
//!
//! Registration happens once per (user, event) pair and issues the opaque
//! code later presented as the QR payload. QR image rendering and the
//! account/auth surface live outside this crate; the engine only creates
//! the binding and enforces its uniqueness.

use crate::error::AttendanceError;
use crate::scan::AttendanceEngine;
use attendance_core::registration::{EventId, Registration};
use attendance_core::store::StoreError;

impl AttendanceEngine {
    /// Register a user (by email) for an event, issuing a fresh code.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::UserNotFound`]: unknown email
    /// - [`AttendanceError::EventNotFound`]: unknown event
    /// - [`AttendanceError::AlreadyRegistered`]: the pair already exists
    /// - [`AttendanceError::Store`]: persistence failure
    #[tracing::instrument(skip(self))]
    pub async fn register(
        &self,
        user_email: &str,
        event_id: EventId,
    ) -> Result<Registration, AttendanceError> {
        let attendee = self
            .store()
            .attendee_by_email(user_email.to_string())
            .await?
            .ok_or_else(|| AttendanceError::UserNotFound(user_email.to_string()))?;
        let event = self
            .store()
            .event(event_id)
            .await?
            .ok_or(AttendanceError::EventNotFound(event_id))?;

        if self.store().registration_exists(attendee.id, event.id).await? {
            return Err(AttendanceError::AlreadyRegistered);
        }

        let registration = Registration::new(attendee.id, event.id, self.clock().now());
        match self.store().insert_registration(registration.clone()).await {
            Ok(()) => {
                tracing::info!(
                    registration_id = %registration.id,
                    event_id = %event.id,
                    "registered user for event"
                );
                Ok(registration)
            }
            // Two racing registrations for the same pair: the store's
            // uniqueness constraint is the backstop.
            Err(StoreError::Constraint(_)) => Err(AttendanceError::AlreadyRegistered),
            Err(error) => Err(error.into()),
        }
    }
}
