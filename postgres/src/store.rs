//! The PostgreSQL implementation of the attendance storage traits.

use attendance_core::fact::{AttendanceFact, FactId, FactKind, FactMetadata};
use attendance_core::registration::{
    Attendee, EventId, EventSummary, Registration, RegistrationCode, RegistrationId, UserId,
};
use attendance_core::store::{Directory, FactStore, StoreError, StoreFuture};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQL-backed attendance store.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PostgresAttendanceStore {
    pool: PgPool,
}

impl PostgresAttendanceStore {
    /// Connect to the database and build a store over a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(db_error)?;
        Ok(Self { pool })
    }

    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        Ok(())
    }
}

fn db_error(error: sqlx::Error) -> StoreError {
    if let Some(db) = error.as_database_error() {
        if db.is_unique_violation() {
            return StoreError::Constraint(db.message().to_string());
        }
    }
    StoreError::Database(error.to_string())
}

fn fact_from_row(row: &PgRow) -> Result<AttendanceFact, StoreError> {
    let id: Uuid = row.try_get("id").map_err(db_error)?;
    let registration_id: Uuid = row.try_get("registration_id").map_err(db_error)?;
    let kind_raw: String = row.try_get("kind").map_err(db_error)?;
    let recorded_at: DateTime<Utc> = row.try_get("recorded_at").map_err(db_error)?;
    let meta_raw: Option<String> = row.try_get("meta").map_err(db_error)?;

    let kind = FactKind::from_str(&kind_raw)
        .map_err(|_| StoreError::Serialization(format!("unknown fact kind: {kind_raw}")))?;

    Ok(AttendanceFact {
        id: FactId::from_uuid(id),
        registration_id: RegistrationId::from_uuid(registration_id),
        kind,
        recorded_at,
        // Malformed stored metadata degrades to empty, never to an error.
        metadata: FactMetadata::parse_lossy(meta_raw.as_deref()),
    })
}

fn registration_from_row(row: &PgRow) -> Result<Registration, StoreError> {
    let id: Uuid = row.try_get("id").map_err(db_error)?;
    let user_id: Uuid = row.try_get("user_id").map_err(db_error)?;
    let event_id: Uuid = row.try_get("event_id").map_err(db_error)?;
    let code: String = row.try_get("code").map_err(db_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_error)?;

    Ok(Registration {
        id: RegistrationId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        event_id: EventId::from_uuid(event_id),
        code: RegistrationCode::new(code),
        created_at,
    })
}

impl FactStore for PostgresAttendanceStore {
    fn append_fact(&self, fact: AttendanceFact) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO attendance_facts (id, registration_id, kind, recorded_at, meta)
                VALUES ($1, $2, $3, $4, $5::jsonb)
                ",
            )
            .bind(fact.id.as_uuid())
            .bind(fact.registration_id.as_uuid())
            .bind(fact.kind.as_str())
            .bind(fact.recorded_at)
            .bind(fact.metadata.to_json())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            Ok(())
        })
    }

    fn load_facts(
        &self,
        registration_id: RegistrationId,
    ) -> StoreFuture<'_, Vec<AttendanceFact>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT id, registration_id, kind, recorded_at, meta::text AS meta
                FROM attendance_facts
                WHERE registration_id = $1
                ORDER BY recorded_at ASC, seq ASC
                ",
            )
            .bind(registration_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.iter().map(fact_from_row).collect()
        })
    }

    fn last_fact(
        &self,
        registration_id: RegistrationId,
    ) -> StoreFuture<'_, Option<AttendanceFact>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT id, registration_id, kind, recorded_at, meta::text AS meta
                FROM attendance_facts
                WHERE registration_id = $1
                ORDER BY recorded_at DESC, seq DESC
                LIMIT 1
                ",
            )
            .bind(registration_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            row.as_ref().map(fact_from_row).transpose()
        })
    }
}

impl Directory for PostgresAttendanceStore {
    fn registration_by_code(
        &self,
        code: RegistrationCode,
    ) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT id, user_id, event_id, code, created_at
                FROM registrations
                WHERE code = $1
                ",
            )
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            row.as_ref().map(registration_from_row).transpose()
        })
    }

    fn registration(&self, id: RegistrationId) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT id, user_id, event_id, code, created_at
                FROM registrations
                WHERE id = $1
                ",
            )
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            row.as_ref().map(registration_from_row).transpose()
        })
    }

    fn registrations_for_event(
        &self,
        event_id: EventId,
    ) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT id, user_id, event_id, code, created_at
                FROM registrations
                WHERE event_id = $1
                ORDER BY created_at ASC
                ",
            )
            .bind(event_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.iter().map(registration_from_row).collect()
        })
    }

    fn registrations_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT id, user_id, event_id, code, created_at
                FROM registrations
                WHERE user_id = $1
                ORDER BY created_at ASC
                ",
            )
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

            rows.iter().map(registration_from_row).collect()
        })
    }

    fn registration_exists(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT 1 AS one
                FROM registrations
                WHERE user_id = $1 AND event_id = $2
                ",
            )
            .bind(user_id.as_uuid())
            .bind(event_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

            Ok(row.is_some())
        })
    }

    fn insert_registration(&self, registration: Registration) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO registrations (id, user_id, event_id, code, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(registration.id.as_uuid())
            .bind(registration.user_id.as_uuid())
            .bind(registration.event_id.as_uuid())
            .bind(registration.code.as_str())
            .bind(registration.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            Ok(())
        })
    }

    fn attendee(&self, id: UserId) -> StoreFuture<'_, Option<Attendee>> {
        Box::pin(async move {
            let row = sqlx::query("SELECT id, name, email FROM attendees WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

            row.map(|row| attendee_from_row(&row)).transpose()
        })
    }

    fn attendee_by_email(&self, email: String) -> StoreFuture<'_, Option<Attendee>> {
        Box::pin(async move {
            let row = sqlx::query("SELECT id, name, email FROM attendees WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

            row.map(|row| attendee_from_row(&row)).transpose()
        })
    }

    fn event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>> {
        Box::pin(async move {
            let row =
                sqlx::query("SELECT id, name, starts_at, ends_at FROM events WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error)?;

            row.map(|row| event_from_row(&row)).transpose()
        })
    }
}

fn attendee_from_row(row: &PgRow) -> Result<Attendee, StoreError> {
    let id: Uuid = row.try_get("id").map_err(db_error)?;
    Ok(Attendee {
        id: UserId::from_uuid(id),
        name: row.try_get("name").map_err(db_error)?,
        email: row.try_get("email").map_err(db_error)?,
    })
}

fn event_from_row(row: &PgRow) -> Result<EventSummary, StoreError> {
    let id: Uuid = row.try_get("id").map_err(db_error)?;
    Ok(EventSummary {
        id: EventId::from_uuid(id),
        name: row.try_get("name").map_err(db_error)?,
        starts_at: row.try_get("starts_at").map_err(db_error)?,
        ends_at: row.try_get("ends_at").map_err(db_error)?,
    })
}
