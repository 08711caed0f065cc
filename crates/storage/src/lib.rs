//! Storage layer for quakedb
//!
//! PostgreSQL via sqlx, one short-lived connection per operation.

mod connection;
mod error;
#[cfg(any(test, feature = "test-support"))]
mod memory;
mod pg_migrations;
mod pg_storage;
pub mod traits;

pub use connection::ConnectionFactory;
pub use error::StorageError;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use pg_storage::PgStorage;
pub use traits::EarthquakeStore;
