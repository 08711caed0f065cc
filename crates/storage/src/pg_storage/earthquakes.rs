//! Form inserts and the two canned queries against `earthquakes`.

use async_trait::async_trait;
use quakedb_core::{
    CatalogRow, Earthquake, IngestReport, MagnitudeRange, QuakeMatch, QueryKind, RadiusFilter,
    EARTH_RADIUS_KM,
};
use sqlx::{Connection, PgConnection, Row};

use super::{row_to_earthquake, PgStorage, QUAKE_SELECT};
use crate::error::StorageError;
use crate::traits::EarthquakeStore;

const INSERT_EARTHQUAKE: &str = r#"INSERT INTO earthquakes
       (id, time, latitude, longitude, depth, mag, place)
       VALUES ($1, $2, $3, $4, $5, $6, $7)"#;

/// Haversine great-circle distance evaluated in SQL.
///
/// `$1`/`$2` are the center latitude/longitude in degrees, `$3` the radius
/// filter, `$4` the Earth radius in km. `LEAST` keeps the arcsine argument in
/// domain when rounding nudges it past 1 near antipodes. The subquery lets the
/// outer `WHERE` filter on the computed alias.
const LOCATION_QUERY: &str = r#"SELECT id, time, latitude, longitude, depth, mag, place, distance_km
       FROM (
           SELECT id, time, latitude, longitude, depth, mag, place,
                  2 * $4 * ASIN(LEAST(1.0, SQRT(
                      POWER(SIN(RADIANS(latitude - $1) / 2), 2)
                      + COS(RADIANS($1)) * COS(RADIANS(latitude))
                        * POWER(SIN(RADIANS(longitude - $2) / 2), 2)
                  ))) AS distance_km
           FROM earthquakes
       ) AS located
       WHERE distance_km <= $3
       ORDER BY time DESC, id"#;

impl PgStorage {
    async fn query_magnitude(
        conn: &mut PgConnection,
        range: &MagnitudeRange,
    ) -> Result<Vec<QuakeMatch>, StorageError> {
        let sql = format!(
            "SELECT {QUAKE_SELECT} FROM earthquakes
             WHERE mag BETWEEN $1 AND $2
             ORDER BY time DESC, id"
        );
        let rows = sqlx::query(&sql)
            .bind(range.min_mag)
            .bind(range.max_mag)
            .fetch_all(&mut *conn)
            .await?;
        rows.iter()
            .map(|row| Ok(QuakeMatch { quake: row_to_earthquake(row)?, distance_km: None }))
            .collect()
    }

    async fn query_location(
        conn: &mut PgConnection,
        filter: &RadiusFilter,
    ) -> Result<Vec<QuakeMatch>, StorageError> {
        let rows = sqlx::query(LOCATION_QUERY)
            .bind(filter.center.latitude)
            .bind(filter.center.longitude)
            .bind(filter.radius_km)
            .bind(EARTH_RADIUS_KM)
            .fetch_all(&mut *conn)
            .await?;
        rows.iter()
            .map(|row| {
                Ok(QuakeMatch {
                    quake: row_to_earthquake(row)?,
                    distance_km: Some(row.try_get("distance_km")?),
                })
            })
            .collect()
    }
}

#[async_trait]
impl EarthquakeStore for PgStorage {
    async fn insert_earthquake(&self, quake: &Earthquake) -> Result<(), StorageError> {
        let mut conn = self.connections.open().await?;
        sqlx::query(INSERT_EARTHQUAKE)
            .bind(&quake.id)
            .bind(quake.time)
            .bind(quake.latitude)
            .bind(quake.longitude)
            .bind(quake.depth)
            .bind(quake.mag)
            .bind(&quake.place)
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        tracing::info!(id = %quake.id, mag = quake.mag, "earthquake inserted");
        Ok(())
    }

    async fn query(&self, kind: &QueryKind) -> Result<Vec<QuakeMatch>, StorageError> {
        let mut conn = self.connections.open().await?;
        let matches = match kind {
            QueryKind::Magnitude(range) => Self::query_magnitude(&mut conn, range).await?,
            QueryKind::Location(filter) => Self::query_location(&mut conn, filter).await?,
        };
        conn.close().await?;
        tracing::debug!(query = %kind, rows = matches.len(), "query executed");
        Ok(matches)
    }

    async fn ingest_catalog(&self, rows: &[CatalogRow]) -> Result<IngestReport, StorageError> {
        self.ingest_rows(rows).await
    }

    async fn catalog_count(&self) -> Result<u64, StorageError> {
        self.count_catalog().await
    }
}
