//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (connection, duplicate key,
//! other database errors) instead of downcasting opaque boxes.

use std::time::Duration;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Credentials rejected, host unreachable, TLS negotiation failed.
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    /// The connect timeout elapsed before the server answered.
    #[error("database connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Unique constraint violation (primary key on `id`).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL / type-coercion / I/O failure on an established connection.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Schema creation failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Whether the database could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::ConnectTimeout(_))
    }
}

/// Custom `From<sqlx::Error>` instead of a blanket `#[from]`.
///
/// - SQLSTATE 23505 → `Duplicate`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23505") => {
                Self::Duplicate(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}
