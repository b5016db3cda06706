//! PostgreSQL storage backend for the attendance engine.
//!
//! Implements the `attendance-core` storage traits over a connection pool.
//! Queries use the runtime sqlx API (not the compile-time-checked macros)
//! so the crate builds without a live database; schema management goes
//! through embedded migrations.
//!
//! # Example
//!
//! ```no_run
//! use attendance_postgres::PostgresAttendanceStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresAttendanceStore::connect("postgres://localhost/attendance").await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

mod store;

pub use store::PostgresAttendanceStore;
