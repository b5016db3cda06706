//! Per-user dashboard rollups across all of a user's registrations.

use crate::error::AttendanceError;
use crate::scan::AttendanceEngine;
use attendance_core::fact::FactKind;
use attendance_core::replay::{credit_hours, total_active_seconds};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How many recent activity entries a dashboard carries.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// One human-readable activity line on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// What happened ("Checked in to", "Completed", ...).
    pub description: &'static str,
    /// The event the activity belongs to.
    pub event_name: String,
    /// When the underlying fact was recorded.
    pub timestamp: DateTime<Utc>,
    /// Status label after the activity ("Active", "Paused", ...).
    pub status: &'static str,
}

/// Cross-event rollup for one user.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    /// Registrations whose event starts after now.
    pub upcoming_events: usize,
    /// Credit hours summed over all registrations.
    pub total_credit_hours: f64,
    /// Total `CHECKIN` facts across all registrations.
    pub checkin_count: usize,
    /// Registrations whose event ended before now.
    pub attended_events: usize,
    /// The five most recent activity entries, newest first.
    pub recent_activity: Vec<ActivityEntry>,
}

const fn activity_description(kind: FactKind) -> &'static str {
    match kind {
        FactKind::CheckIn => "Checked in to",
        FactKind::CheckOut => "Completed",
        FactKind::Pause => "Paused attendance at",
        FactKind::Resume => "Resumed attendance at",
        FactKind::Manual => "Updated status for",
    }
}

const fn activity_status(kind: FactKind) -> &'static str {
    match kind {
        FactKind::CheckIn | FactKind::Resume => "Active",
        FactKind::CheckOut => "Completed",
        FactKind::Pause => "Paused",
        FactKind::Manual => "Updated",
    }
}

impl AttendanceEngine {
    /// Dashboard statistics for one user, looked up by email.
    ///
    /// Aggregates across every registration the user holds: upcoming and
    /// attended event counts against the clock, check-in scan count,
    /// summed credit hours, and the most recent activity entries.
    ///
    /// # Errors
    ///
    /// - [`AttendanceError::UserNotFound`]: unknown email
    /// - [`AttendanceError::EventNotFound`]: a registration points at a
    ///   missing event (directory inconsistency)
    /// - [`AttendanceError::Store`]: persistence failure
    pub async fn user_dashboard_stats(
        &self,
        user_email: &str,
    ) -> Result<DashboardStats, AttendanceError> {
        let attendee = self
            .store()
            .attendee_by_email(user_email.to_string())
            .await?
            .ok_or_else(|| AttendanceError::UserNotFound(user_email.to_string()))?;

        let registrations = self.store().registrations_for_user(attendee.id).await?;
        let now = self.clock().now();

        let mut upcoming_events = 0;
        let mut attended_events = 0;
        let mut checkin_count = 0;
        let mut total_credit_hours = 0.0;
        let mut activity = Vec::new();

        for registration in registrations {
            let event = self
                .store()
                .event(registration.event_id)
                .await?
                .ok_or(AttendanceError::EventNotFound(registration.event_id))?;

            if event.starts_at > now {
                upcoming_events += 1;
            }
            if event.ends_at < now {
                attended_events += 1;
            }

            let facts = self.store().load_facts(registration.id).await?;
            total_credit_hours += credit_hours(total_active_seconds(&facts, now));
            checkin_count += facts
                .iter()
                .filter(|fact| fact.kind == FactKind::CheckIn)
                .count();

            for fact in &facts {
                activity.push(ActivityEntry {
                    description: activity_description(fact.kind),
                    event_name: event.name.clone(),
                    timestamp: fact.recorded_at,
                    status: activity_status(fact.kind),
                });
            }
        }

        activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activity.truncate(RECENT_ACTIVITY_LIMIT);

        Ok(DashboardStats {
            upcoming_events,
            total_credit_hours,
            checkin_count,
            attended_events,
            recent_activity: activity,
        })
    }
}
