//! CSV catalog ingest into `earthquakes2`.

use quakedb_core::{CatalogRow, IngestReport};
use sqlx::Connection;

use super::PgStorage;
use crate::error::StorageError;

/// Existence check and insert in one statement, so no other statement on this
/// connection can interleave between them. Under READ COMMITTED a concurrent
/// upload can still pass the same `NOT EXISTS`; the primary key then rejects
/// the second insert and that batch rolls back.
const CONDITIONAL_INSERT: &str = r#"INSERT INTO earthquakes2 (id, time, latitude, longitude, mag, nst, net)
       SELECT $1, $2, $3, $4, $5, $6, $7
       WHERE NOT EXISTS (SELECT 1 FROM earthquakes2 WHERE id = $1)"#;

impl PgStorage {
    pub(super) async fn ingest_rows(&self, rows: &[CatalogRow]) -> Result<IngestReport, StorageError> {
        let mut conn = self.connections.open().await?;
        let mut tx = conn.begin().await?;
        let mut report = IngestReport::default();

        for row in rows {
            let result = sqlx::query(CONDITIONAL_INSERT)
                .bind(&row.id)
                .bind(row.time)
                .bind(row.latitude)
                .bind(row.longitude)
                .bind(row.mag)
                .bind(row.nst)
                .bind(&row.net)
                .execute(&mut *tx)
                .await;
            match result {
                Ok(done) if done.rows_affected() > 0 => report.inserted += 1,
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    // Dropping `tx` rolls back everything written so far.
                    tracing::warn!(id = %row.id, "catalog row failed, rolling back batch: {e}");
                    return Err(e.into());
                },
            }
        }

        tx.commit().await?;
        conn.close().await?;
        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "catalog batch committed"
        );
        Ok(report)
    }

    pub(super) async fn count_catalog(&self) -> Result<u64, StorageError> {
        let mut conn = self.connections.open().await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM earthquakes2").fetch_one(&mut conn).await?;
        conn.close().await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
