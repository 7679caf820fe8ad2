//! Configuration handling for the DVD rental MCP server.
//!
//! Settings come from CLI arguments with environment variable fallbacks and
//! are read once at startup. Database settings are resolved into an
//! immutable [`DatabaseConfig`] that is handed to the connection factory.

use crate::error::{DbError, DbResult};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_PG_PORT: u16 = 5432;
pub const DEFAULT_PG_USER: &str = "postgres";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Resolved connection parameters for the backing PostgreSQL database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Sensitive - never logged.
    pub password: Option<String>,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Connection target without credentials, safe for logs.
    pub fn display_target(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "dvdrental-mcp-server",
    about = "MCP server exposing DVD rental operations over a PostgreSQL database",
    version,
    author
)]
pub struct Config {
    /// PostgreSQL host
    #[arg(long, value_name = "HOST", env = "PG_HOST")]
    pub pg_host: Option<String>,

    /// PostgreSQL port
    #[arg(long, default_value_t = DEFAULT_PG_PORT, env = "PG_PORT")]
    pub pg_port: u16,

    /// Database name
    #[arg(long, value_name = "NAME", env = "PG_DB")]
    pub pg_db: Option<String>,

    /// Database user
    #[arg(long, default_value = DEFAULT_PG_USER, env = "PG_USER")]
    pub pg_user: String,

    /// Database password
    #[arg(long, env = "PG_PASSWORD", hide_env_values = true)]
    pub pg_password: Option<String>,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "MCP_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            pg_host: None,
            pg_port: DEFAULT_PG_PORT,
            pg_db: None,
            pg_user: DEFAULT_PG_USER.to_string(),
            pg_password: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Resolve the database connection parameters.
    ///
    /// Host and database name are required; an empty password is treated as
    /// no password.
    pub fn database_config(&self) -> DbResult<DatabaseConfig> {
        let host = required(self.pg_host.as_deref(), "PG_HOST")?;
        let database = required(self.pg_db.as_deref(), "PG_DB")?;

        let user = self.pg_user.trim();
        if user.is_empty() {
            return Err(DbError::configuration("PG_USER must not be empty"));
        }
        if self.pg_port == 0 {
            return Err(DbError::configuration("PG_PORT must be greater than 0"));
        }

        Ok(DatabaseConfig {
            host,
            port: self.pg_port,
            database,
            user: user.to_string(),
            password: self.pg_password.clone().filter(|p| !p.is_empty()),
            connect_timeout: self.connect_timeout_duration(),
        })
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Load a `.env` file from the working directory (or a parent) into the
/// process environment before arguments are parsed.
///
/// Variables already set in the environment take precedence. A missing file
/// is not an error; an unreadable or malformed one is.
pub fn load_env_file() -> DbResult<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(DbError::configuration(format!("Failed to load .env file: {e}"))),
    }
}

fn required(value: Option<&str>, name: &str) -> DbResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DbError::configuration(format!("{name} is not set"))),
    }
}
