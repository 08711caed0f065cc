//! Shared constants for quakedb.
//!
//! Compiled-in connection parameters and query defaults. Every connection
//! parameter except the password may be overridden from the environment.

/// Mean Earth radius used by the great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default lower magnitude bound when `min_mag` is omitted.
pub const DEFAULT_MIN_MAG: f64 = 0.0;

/// Default upper magnitude bound when `max_mag` is omitted.
pub const DEFAULT_MAX_MAG: f64 = 10.0;

/// Default search radius when `radius_km` is omitted.
pub const DEFAULT_RADIUS_KM: f64 = 500.0;

/// Database host when `QUAKEDB_DB_HOST` is not set.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Database port when `QUAKEDB_DB_PORT` is not set.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Database name when `QUAKEDB_DB_NAME` is not set.
pub const DEFAULT_DB_NAME: &str = "earthquakes";

/// Database user when `QUAKEDB_DB_USER` is not set.
pub const DEFAULT_DB_USER: &str = "quakedb";

/// Connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Directory uploaded CSV files are written to.
pub const DEFAULT_UPLOAD_DIR: &str = "static/uploads";

/// Maximum accepted request body for uploads (10 MiB).
pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Environment variable holding the database password.
pub const SQL_PASSWORD_ENV: &str = "SQL_PASSWORD";
