//! Typed error enum for the service layer.
//!
//! Lets handlers tell caller mistakes (bad field, bad row, bad file) apart
//! from storage failures without downcasting.

use quakedb_core::ValidationError;
use quakedb_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (connect, duplicate, SQL).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// A form field failed typed parsing.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A CSV data row failed typed parsing. `row` counts non-blank data
    /// rows from 1; `line` is the physical line in the file.
    #[error("row {row} (line {line}): {source}")]
    InvalidRow {
        row: usize,
        line: u64,
        #[source]
        source: ValidationError,
    },

    /// The CSV framing itself is broken (bad quoting, invalid UTF-8).
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The uploaded file is not a CSV file.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Writing or reading a catalog file failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Whether the caller is at fault (bad form, bad file) rather than the backend.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidRow { .. } | Self::Csv(_) | Self::InvalidUpload(_)
        )
    }

    /// Whether this error is a primary-key conflict on the single insert.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}
