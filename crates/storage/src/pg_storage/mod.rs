//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by table: `earthquakes` (form inserts and the
//! canned queries) and `catalog` (`earthquakes2`, CSV ingest).

mod catalog;
mod earthquakes;

use quakedb_core::{DbConfig, Earthquake};
use sqlx::{Connection, Row};

use crate::connection::ConnectionFactory;
use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    connections: ConnectionFactory,
}

impl PgStorage {
    pub fn new(config: &DbConfig) -> Self {
        Self { connections: ConnectionFactory::new(config) }
    }

    pub const fn with_factory(connections: ConnectionFactory) -> Self {
        Self { connections }
    }

    /// Create both tables and their indexes if missing.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        let mut conn = self.connections.open().await?;
        run_pg_migrations(&mut conn).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        conn.close().await?;
        tracing::info!("earthquake schema ready");
        Ok(())
    }

    /// Open and immediately close a connection; surfaces bad credentials at
    /// startup instead of on the first request.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let conn = self.connections.open().await?;
        conn.close().await?;
        Ok(())
    }
}

pub(crate) const QUAKE_SELECT: &str = "id, time, latitude, longitude, depth, mag, place";

pub(crate) fn row_to_earthquake(row: &sqlx::postgres::PgRow) -> Result<Earthquake, StorageError> {
    Ok(Earthquake {
        id: row.try_get("id")?,
        time: row.try_get("time")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        depth: row.try_get("depth")?,
        mag: row.try_get("mag")?,
        place: row.try_get("place")?,
    })
}
