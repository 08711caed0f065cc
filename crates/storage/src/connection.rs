//! Connection factory: one short-lived connection per storage operation.
//!
//! No pool: every call to [`ConnectionFactory::open`] performs a full
//! connect/authenticate handshake, and callers close the connection when
//! their statement (or transaction) is done.

use std::fmt;
use std::time::Duration;

use quakedb_core::DbConfig;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};

use crate::error::StorageError;

#[derive(Clone)]
pub struct ConnectionFactory {
    options: PgConnectOptions,
    timeout: Duration,
}

impl fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConnectionFactory {
    pub fn new(config: &DbConfig) -> Self {
        let ssl_mode = if config.require_tls { PgSslMode::Require } else { PgSslMode::Prefer };
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password)
            .ssl_mode(ssl_mode)
            .application_name("quakedb");
        Self { options, timeout: config.connect_timeout }
    }

    /// Build from a `postgres://` URL. Used by integration tests and tooling
    /// that already carry a `DATABASE_URL`.
    pub fn from_url(url: &str, timeout: Duration) -> Result<Self, StorageError> {
        let options: PgConnectOptions = url.parse().map_err(StorageError::Connect)?;
        Ok(Self { options: options.application_name("quakedb"), timeout })
    }

    pub async fn open(&self) -> Result<PgConnection, StorageError> {
        match tokio::time::timeout(self.timeout, PgConnection::connect_with(&self.options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                tracing::warn!(
                    host = %self.options.get_host(),
                    database = ?self.options.get_database(),
                    "database connect failed: {e}"
                );
                Err(StorageError::Connect(e))
            },
            Err(_) => {
                tracing::warn!(
                    host = %self.options.get_host(),
                    timeout = ?self.timeout,
                    "database connect timed out"
                );
                Err(StorageError::ConnectTimeout(self.timeout))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let mut config = DbConfig::with_password("pw");
        config.host = "db.internal".to_owned();
        config.port = 6543;
        config.database = "quakes".to_owned();
        let factory = ConnectionFactory::new(&config);
        assert_eq!(factory.options.get_host(), "db.internal");
        assert_eq!(factory.options.get_port(), 6543);
        assert_eq!(factory.options.get_database(), Some("quakes"));
        assert_eq!(factory.timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_omits_password() {
        let factory = ConnectionFactory::new(&DbConfig::with_password("s3cret"));
        assert!(!format!("{factory:?}").contains("s3cret"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(ConnectionFactory::from_url("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn unreachable_host_fails_fast() {
        let mut config = DbConfig::with_password("pw");
        config.host = "127.0.0.1".to_owned();
        config.port = 1;
        config.connect_timeout = Duration::from_secs(5);
        let err = ConnectionFactory::new(&config).open().await.unwrap_err();
        assert!(err.is_connection());
    }
}
