//! Local CSV import through the same parse and ingest path as `/upload`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use quakedb_core::AppConfig;
use quakedb_service::QuakeService;
use quakedb_storage::PgStorage;

pub(crate) async fn run(config: &AppConfig, path: &Path) -> Result<()> {
    let storage = Arc::new(PgStorage::new(&config.db));
    let service = QuakeService::new(storage, config.upload_dir.clone());
    let report = service
        .import_file(path)
        .await
        .with_context(|| format!("failed to import {}", path.display()))?;
    println!("rows: {}", report.total());
    println!("inserted: {}", report.inserted);
    println!("skipped: {}", report.skipped);
    Ok(())
}
