//! The bulk checkout sweep: administrator-initiated closure of an event.
//!
//! For every registration on the event whose last fact is not `CHECKOUT`
//! (including registrations with no facts at all), append a checkout
//! tagged as administrator-initiated. The sweep acquires the same
//! per-registration lock as live scans, one registration at a time, so a
//! scan arriving mid-sweep serializes cleanly before or after that
//! registration's closure instead of interleaving with it.

use crate::error::AttendanceError;
use crate::scan::AttendanceEngine;
use attendance_core::fact::{AttendanceFact, FactKind, FactMetadata};
use attendance_core::registration::EventId;
use serde::Serialize;

/// Counts reported by a bulk checkout sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BulkCheckoutReport {
    /// The swept event.
    pub event_id: EventId,
    /// Registrations on the event.
    pub total: usize,
    /// Registrations a checkout was appended for.
    pub newly_closed: usize,
    /// Registrations whose last fact was already a checkout.
    pub already_closed: usize,
}

impl AttendanceEngine {
    /// Check out every registration on an event that is not already
    /// checked out.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::EventNotFound`]: unknown event
    /// - [`AttendanceError::Store`]: persistence failure; registrations
    ///   already swept stay closed, the rest are untouched
    #[tracing::instrument(skip(self))]
    pub async fn bulk_checkout(
        &self,
        event_id: EventId,
    ) -> Result<BulkCheckoutReport, AttendanceError> {
        self.store()
            .event(event_id)
            .await?
            .ok_or(AttendanceError::EventNotFound(event_id))?;

        let registrations = self.store().registrations_for_event(event_id).await?;
        let total = registrations.len();
        let mut newly_closed = 0;
        let mut already_closed = 0;

        for registration in registrations {
            let _guard = self.locks().acquire(registration.id).await;

            let last = self.store().last_fact(registration.id).await?;
            if last.map(|fact| fact.kind) == Some(FactKind::CheckOut) {
                already_closed += 1;
                continue;
            }

            let fact = AttendanceFact::new(
                registration.id,
                FactKind::CheckOut,
                self.clock().now(),
                FactMetadata::bulk_checkout(),
            );
            self.store().append_fact(fact).await?;
            newly_closed += 1;
        }

        tracing::info!(
            event_id = %event_id,
            total,
            newly_closed,
            already_closed,
            "bulk checkout sweep complete"
        );

        Ok(BulkCheckoutReport {
            event_id,
            total,
            newly_closed,
            already_closed,
        })
    }
}
