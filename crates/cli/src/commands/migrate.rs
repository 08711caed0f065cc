//! Schema creation command.
//!
//! Idempotent: tables and indexes are created only when missing.

use anyhow::Result;
use quakedb_core::AppConfig;
use quakedb_storage::PgStorage;

pub(crate) async fn run(config: &AppConfig) -> Result<()> {
    let storage = PgStorage::new(&config.db);
    storage.migrate().await?;
    println!(
        "Schema ready on {}:{}/{}",
        config.db.host, config.db.port, config.db.database
    );
    Ok(())
}
