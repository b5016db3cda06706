//! In-memory attendance store for fast, deterministic tests.

use attendance_core::fact::AttendanceFact;
use attendance_core::registration::{
    Attendee, EventId, EventSummary, Registration, RegistrationCode, RegistrationId, UserId,
};
use attendance_core::store::{Directory, FactStore, StoreError, StoreFuture};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
struct Inner {
    attendees: HashMap<UserId, Attendee>,
    events: HashMap<EventId, EventSummary>,
    registrations: HashMap<RegistrationId, Registration>,
    // Append order doubles as the tiebreak for equal timestamps.
    facts: HashMap<RegistrationId, Vec<AttendanceFact>>,
}

/// In-memory implementation of the attendance storage traits.
///
/// Backed by `HashMap`s under a single mutex. Fixture builders make test
/// setup terse; the trait implementations mirror the ordering guarantees
/// of the PostgreSQL store (facts ascending by recorded time, append order
/// breaking ties).
///
/// # Example
///
/// ```
/// use attendance_testing::InMemoryAttendanceStore;
/// use attendance_core::registration::{Attendee, EventSummary, EventId, Registration, UserId};
/// use chrono::{Duration, Utc};
///
/// let user = UserId::new();
/// let event = EventId::new();
/// let store = InMemoryAttendanceStore::new()
///     .with_attendee(Attendee {
///         id: user,
///         name: "Ada Lovelace".to_string(),
///         email: "ada@example.com".to_string(),
///     })
///     .with_event(EventSummary {
///         id: event,
///         name: "RustConf".to_string(),
///         starts_at: Utc::now(),
///         ends_at: Utc::now() + Duration::hours(8),
///     })
///     .with_registration(Registration::new(user, event, Utc::now()));
/// ```
#[derive(Default)]
pub struct InMemoryAttendanceStore {
    inner: Mutex<Inner>,
}

impl InMemoryAttendanceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an attendee.
    #[must_use]
    pub fn with_attendee(self, attendee: Attendee) -> Self {
        self.lock().attendees.insert(attendee.id, attendee);
        self
    }

    /// Seed an event.
    #[must_use]
    pub fn with_event(self, event: EventSummary) -> Self {
        self.lock().events.insert(event.id, event);
        self
    }

    /// Seed a registration.
    #[must_use]
    pub fn with_registration(self, registration: Registration) -> Self {
        self.lock()
            .registrations
            .insert(registration.id, registration);
        self
    }

    /// Number of facts stored for a registration (assertion helper).
    #[must_use]
    pub fn fact_count(&self, registration_id: RegistrationId) -> usize {
        self.lock()
            .facts
            .get(&registration_id)
            .map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FactStore for InMemoryAttendanceStore {
    fn append_fact(&self, fact: AttendanceFact) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.lock()
                .facts
                .entry(fact.registration_id)
                .or_default()
                .push(fact);
            Ok(())
        })
    }

    fn load_facts(
        &self,
        registration_id: RegistrationId,
    ) -> StoreFuture<'_, Vec<AttendanceFact>> {
        Box::pin(async move {
            let mut facts = self
                .lock()
                .facts
                .get(&registration_id)
                .cloned()
                .unwrap_or_default();
            // Stable: append order preserved among equal timestamps.
            facts.sort_by_key(|fact| fact.recorded_at);
            Ok(facts)
        })
    }

    fn last_fact(
        &self,
        registration_id: RegistrationId,
    ) -> StoreFuture<'_, Option<AttendanceFact>> {
        Box::pin(async move {
            Ok(self
                .lock()
                .facts
                .get(&registration_id)
                // max_by_key keeps the last of equal maxima, matching the
                // append-order tiebreak.
                .and_then(|facts| facts.iter().max_by_key(|fact| fact.recorded_at).cloned()))
        })
    }
}

impl Directory for InMemoryAttendanceStore {
    fn registration_by_code(
        &self,
        code: RegistrationCode,
    ) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move {
            Ok(self
                .lock()
                .registrations
                .values()
                .find(|reg| reg.code == code)
                .cloned())
        })
    }

    fn registration(&self, id: RegistrationId) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move { Ok(self.lock().registrations.get(&id).cloned()) })
    }

    fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let mut regs: Vec<Registration> = self
                .lock()
                .registrations
                .values()
                .filter(|reg| reg.event_id == event_id)
                .cloned()
                .collect();
            regs.sort_by_key(|reg| reg.created_at);
            Ok(regs)
        })
    }

    fn registrations_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let mut regs: Vec<Registration> = self
                .lock()
                .registrations
                .values()
                .filter(|reg| reg.user_id == user_id)
                .cloned()
                .collect();
            regs.sort_by_key(|reg| reg.created_at);
            Ok(regs)
        })
    }

    fn registration_exists(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            Ok(self
                .lock()
                .registrations
                .values()
                .any(|reg| reg.user_id == user_id && reg.event_id == event_id))
        })
    }

    fn insert_registration(&self, registration: Registration) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut inner = self.lock();
            let duplicate = inner.registrations.values().any(|existing| {
                (existing.user_id == registration.user_id
                    && existing.event_id == registration.event_id)
                    || existing.code == registration.code
            });
            if duplicate {
                return Err(StoreError::Constraint(
                    "registration user/event or code already taken".to_string(),
                ));
            }
            inner.registrations.insert(registration.id, registration);
            Ok(())
        })
    }

    fn attendee(&self, id: UserId) -> StoreFuture<'_, Option<Attendee>> {
        Box::pin(async move { Ok(self.lock().attendees.get(&id).cloned()) })
    }

    fn attendee_by_email(&self, email: String) -> StoreFuture<'_, Option<Attendee>> {
        Box::pin(async move {
            Ok(self
                .lock()
                .attendees
                .values()
                .find(|attendee| attendee.email == email)
                .cloned())
        })
    }

    fn event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>> {
        Box::pin(async move { Ok(self.lock().events.get(&id).cloned()) })
    }
}
