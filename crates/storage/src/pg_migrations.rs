//! PostgreSQL schema for the earthquake tables.
//!
//! The server assumes these tables already exist; `quakedb migrate` and the
//! integration tests are the only callers.

use sqlx::PgConnection;

/// Create tables and indexes if missing. Idempotent.
pub async fn run_pg_migrations(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS earthquakes (
            id TEXT PRIMARY KEY,
            time TIMESTAMP NOT NULL,
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            depth DOUBLE PRECISION NOT NULL,
            mag DOUBLE PRECISION NOT NULL,
            place TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_earthquakes_mag ON earthquakes (mag)")
        .execute(&mut *conn)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_earthquakes_time ON earthquakes (time DESC)")
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS earthquakes2 (
            id TEXT PRIMARY KEY,
            time TIMESTAMP NOT NULL,
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            mag DOUBLE PRECISION,
            nst INTEGER,
            net TEXT
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}
