//! In-process `EarthquakeStore` for tests of the layers above storage.
//!
//! Mirrors the Postgres semantics that callers rely on: duplicate ids on the
//! single insert, `time DESC, id` ordering, inclusive magnitude bounds,
//! haversine radius filtering, and all-or-nothing catalog batches.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use quakedb_core::{CatalogRow, Earthquake, IngestReport, QuakeMatch, QueryKind};

use crate::error::StorageError;
use crate::traits::EarthquakeStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    earthquakes: Mutex<Vec<Earthquake>>,
    catalog: Mutex<BTreeMap<String, CatalogRow>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_earthquakes(quakes: impl IntoIterator<Item = Earthquake>) -> Self {
        let store = Self::default();
        lock(&store.earthquakes).extend(quakes);
        store
    }

    pub fn earthquakes(&self) -> Vec<Earthquake> {
        lock(&self.earthquakes).clone()
    }

    pub fn catalog_rows(&self) -> Vec<CatalogRow> {
        lock(&self.catalog).values().cloned().collect()
    }
}

#[async_trait]
impl EarthquakeStore for MemoryStore {
    async fn insert_earthquake(&self, quake: &Earthquake) -> Result<(), StorageError> {
        let mut quakes = lock(&self.earthquakes);
        if quakes.iter().any(|q| q.id == quake.id) {
            return Err(StorageError::Duplicate(format!(
                "duplicate key value violates unique constraint \"earthquakes_pkey\" ({})",
                quake.id
            )));
        }
        quakes.push(quake.clone());
        Ok(())
    }

    async fn query(&self, kind: &QueryKind) -> Result<Vec<QuakeMatch>, StorageError> {
        let quakes = lock(&self.earthquakes);
        let mut matches: Vec<QuakeMatch> = quakes
            .iter()
            .filter_map(|q| match kind {
                QueryKind::Magnitude(range) => range
                    .contains(q.mag)
                    .then(|| QuakeMatch { quake: q.clone(), distance_km: None }),
                QueryKind::Location(filter) => {
                    let distance = filter.distance_km(q.location());
                    (distance <= filter.radius_km)
                        .then(|| QuakeMatch { quake: q.clone(), distance_km: Some(distance) })
                },
            })
            .collect();
        matches.sort_by(|a, b| {
            b.quake.time.cmp(&a.quake.time).then_with(|| a.quake.id.cmp(&b.quake.id))
        });
        Ok(matches)
    }

    async fn ingest_catalog(&self, rows: &[CatalogRow]) -> Result<IngestReport, StorageError> {
        let mut catalog = lock(&self.catalog);
        let mut report = IngestReport::default();
        for row in rows {
            if catalog.contains_key(&row.id) {
                report.skipped += 1;
            } else {
                catalog.insert(row.id.clone(), row.clone());
                report.inserted += 1;
            }
        }
        Ok(report)
    }

    async fn catalog_count(&self) -> Result<u64, StorageError> {
        Ok(lock(&self.catalog).len() as u64)
    }
}
