//! Storage trait seam between the service layer and a concrete backend.

use async_trait::async_trait;
use quakedb_core::{CatalogRow, Earthquake, IngestReport, QuakeMatch, QueryKind};

use crate::error::StorageError;

#[async_trait]
pub trait EarthquakeStore: Send + Sync {
    /// Insert one row into `earthquakes`. A repeated id is
    /// [`StorageError::Duplicate`].
    async fn insert_earthquake(&self, quake: &Earthquake) -> Result<(), StorageError>;

    /// Run one of the canned queries. Results are ordered by time, newest
    /// first, ties broken by id.
    async fn query(&self, kind: &QueryKind) -> Result<Vec<QuakeMatch>, StorageError>;

    /// Conditionally insert every row into `earthquakes2`, skipping ids that
    /// already exist. All-or-nothing: either every statement commits or none do.
    async fn ingest_catalog(&self, rows: &[CatalogRow]) -> Result<IngestReport, StorageError>;

    /// Number of rows in `earthquakes2`.
    async fn catalog_count(&self) -> Result<u64, StorageError>;
}
