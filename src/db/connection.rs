//! Connection factory.
//!
//! Every operation opens its own `PgConnection` from the static
//! [`DatabaseConfig`] and closes it when done. There is no pooling and no
//! connection reuse between calls.

use crate::config::DatabaseConfig;
use crate::error::{DbError, DbResult};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Opens fresh database connections from immutable configuration.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    config: Arc<DatabaseConfig>,
}

impl ConnectionFactory {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Build driver options from the configuration.
    ///
    /// Statement logging is turned off in the driver; the executor logs
    /// statements itself at debug level.
    pub fn connect_options(&self) -> PgConnectOptions {
        let config = &self.config;
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .application_name("dvdrental-mcp-server");

        if let Some(password) = &config.password {
            options = options.password(password);
        }

        options.disable_statement_logging()
    }

    /// Open a new connection.
    ///
    /// Any failure while connecting (unreachable host, bad credentials,
    /// unknown database) is reported as a connection error and is not retried.
    pub async fn connect(&self) -> DbResult<PgConnection> {
        let start = Instant::now();
        let connect_timeout = self.config.connect_timeout;
        let options = self.connect_options();

        let conn = match timeout(connect_timeout, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                warn!(
                    target_db = %self.config.display_target(),
                    error = %e,
                    "Failed to connect"
                );
                return Err(DbError::connection(
                    format!("Failed to connect: {}", e),
                    connection_suggestion(&e),
                ));
            }
            Err(_) => {
                warn!(
                    target_db = %self.config.display_target(),
                    timeout_secs = connect_timeout.as_secs(),
                    "Connection attempt timed out"
                );
                return Err(DbError::timeout("connect", connect_timeout.as_secs()));
            }
        };

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Database connection opened"
        );
        Ok(conn)
    }

    /// Close a connection, logging (not propagating) close failures.
    ///
    /// The outcome of the operation has already been decided by the time the
    /// connection is released.
    pub async fn release(&self, conn: PgConnection) {
        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection cleanly");
        }
    }
}

/// Generate a helpful suggestion for connection errors.
fn connection_suggestion(error: &sqlx::Error) -> String {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") {
        return "Check that the PostgreSQL server is running and accessible".to_string();
    }

    if error_str.contains("authentication") || error_str.contains("password") {
        return "Verify PG_USER and PG_PASSWORD".to_string();
    }

    if error_str.contains("does not exist") {
        return "Check that PG_DB names an existing database".to_string();
    }

    if error_str.contains("tls") || error_str.contains("ssl") {
        return "Check TLS/SSL configuration or try disabling it".to_string();
    }

    "Verify PG_HOST and PG_PORT point at a PostgreSQL server".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            database: "dvdrental".to_string(),
            user: "postgres".to_string(),
            password: Some("secret".to_string()),
            connect_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_connect_options_carry_config() {
        let factory = ConnectionFactory::new(test_config());
        let options = factory.connect_options();
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 1);
        assert_eq!(options.get_database(), Some("dvdrental"));
        assert_eq!(options.get_username(), "postgres");
    }

    #[test]
    fn test_connection_suggestion_for_refused() {
        let err = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert!(connection_suggestion(&err).contains("running"));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_is_connection_error() {
        let factory = ConnectionFactory::new(test_config());
        let err = factory.connect().await.unwrap_err();
        assert!(
            matches!(err, DbError::Connection { .. } | DbError::Timeout { .. }),
            "unexpected error: {:?}",
            err
        );
    }
}
