//! Startup configuration.
//!
//! Built once in the binary and handed down explicitly; nothing below the
//! CLI reads the environment on its own.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PORT,
    DEFAULT_DB_USER, DEFAULT_UPLOAD_DIR, DEFAULT_UPLOAD_LIMIT_BYTES, SQL_PASSWORD_ENV,
};
use crate::env_config::{parse_with_default, string_or_default};
use crate::error::ConfigError;

/// Connection parameters for the earthquake database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Refuse to connect without TLS (`sslmode=require`) instead of
    /// preferring it.
    pub require_tls: bool,
    pub connect_timeout: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("require_tls", &self.require_tls)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DbConfig {
    /// Compiled-in defaults with the given password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_owned(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_NAME.to_owned(),
            username: DEFAULT_DB_USER.to_owned(),
            password: password.into(),
            require_tls: false,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. `SQL_PASSWORD` is mandatory;
    /// everything else falls back to the compiled-in constants.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = lookup(SQL_PASSWORD_ENV)
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingSecret(SQL_PASSWORD_ENV))?;
        let timeout_secs = parse_with_default(
            "QUAKEDB_DB_CONNECT_TIMEOUT_SECS",
            lookup("QUAKEDB_DB_CONNECT_TIMEOUT_SECS").as_deref(),
            DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        Ok(Self {
            host: string_or_default(lookup("QUAKEDB_DB_HOST").as_deref(), DEFAULT_DB_HOST),
            port: parse_with_default(
                "QUAKEDB_DB_PORT",
                lookup("QUAKEDB_DB_PORT").as_deref(),
                DEFAULT_DB_PORT,
            ),
            database: string_or_default(lookup("QUAKEDB_DB_NAME").as_deref(), DEFAULT_DB_NAME),
            username: string_or_default(lookup("QUAKEDB_DB_USER").as_deref(), DEFAULT_DB_USER),
            password,
            require_tls: parse_with_default(
                "QUAKEDB_DB_REQUIRE_TLS",
                lookup("QUAKEDB_DB_REQUIRE_TLS").as_deref(),
                false,
            ),
            connect_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub upload_dir: PathBuf,
    pub upload_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = DbConfig::from_lookup(&lookup)?;
        Ok(Self {
            db,
            upload_dir: PathBuf::from(string_or_default(
                lookup("QUAKEDB_UPLOAD_DIR").as_deref(),
                DEFAULT_UPLOAD_DIR,
            )),
            upload_limit_bytes: parse_with_default(
                "QUAKEDB_UPLOAD_LIMIT_BYTES",
                lookup("QUAKEDB_UPLOAD_LIMIT_BYTES").as_deref(),
                DEFAULT_UPLOAD_LIMIT_BYTES,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn missing_password_is_a_config_error() {
        let err = DbConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret("SQL_PASSWORD"));

        let err = DbConfig::from_lookup(lookup_from(&[("SQL_PASSWORD", "")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret("SQL_PASSWORD"));
    }

    #[test]
    fn defaults_apply_when_only_password_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("SQL_PASSWORD", "hunter2")])).unwrap();
        assert_eq!(cfg.db.host, DEFAULT_DB_HOST);
        assert_eq!(cfg.db.port, DEFAULT_DB_PORT);
        assert_eq!(cfg.db.database, DEFAULT_DB_NAME);
        assert_eq!(cfg.db.username, DEFAULT_DB_USER);
        assert_eq!(cfg.db.password, "hunter2");
        assert!(!cfg.db.require_tls);
        assert_eq!(cfg.db.connect_timeout, Duration::from_secs(30));
        assert_eq!(cfg.upload_dir, PathBuf::from("static/uploads"));
        assert_eq!(cfg.upload_limit_bytes, DEFAULT_UPLOAD_LIMIT_BYTES);
    }

    #[test]
    fn overrides_and_invalid_values() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("SQL_PASSWORD", "pw"),
            ("QUAKEDB_DB_HOST", "db.internal"),
            ("QUAKEDB_DB_PORT", "not-a-port"),
            ("QUAKEDB_DB_REQUIRE_TLS", "true"),
            ("QUAKEDB_UPLOAD_DIR", "/var/lib/quakedb/uploads"),
        ]))
        .unwrap();
        assert_eq!(cfg.db.host, "db.internal");
        assert_eq!(cfg.db.port, DEFAULT_DB_PORT);
        assert!(cfg.db.require_tls);
        assert_eq!(cfg.upload_dir, PathBuf::from("/var/lib/quakedb/uploads"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let cfg = DbConfig::with_password("s3cret");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
