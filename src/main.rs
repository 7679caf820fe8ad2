//! DVD Rental MCP Server - Main entry point.
//!
//! Serves the DVD rental tools over stdio or Streamable HTTP against a
//! PostgreSQL database configured through `PG_*` environment variables,
//! optionally read from a `.env` file.

use dvdrental_mcp_server::config::{Config, TransportMode, load_env_file};
use dvdrental_mcp_server::db::{ConnectionFactory, QueryExecutor};
use dvdrental_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber. Logs go to stderr so stdout stays
/// reserved for the stdio protocol stream.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = match load_env_file() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = Config::parse_args();

    if config.enable_logs {
        init_tracing(&config);
    }

    if let Some(path) = &env_file {
        info!(path = %path.display(), "Loaded environment file");
    }

    let db_config = match config.database_config() {
        Ok(db_config) => db_config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Usage: dvdrental-mcp-server --pg-host <HOST> --pg-db <NAME>");
            eprintln!();
            eprintln!("Environment:");
            eprintln!("  PG_HOST, PG_DB        required");
            eprintln!("  PG_PORT               default 5432");
            eprintln!("  PG_USER               default postgres");
            eprintln!("  PG_PASSWORD           optional");
            eprintln!();
            eprintln!("Variables may also be placed in a .env file.");
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        database = %db_config.display_target(),
        "Starting DVD Rental MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let executor = QueryExecutor::new(ConnectionFactory::new(db_config));

    let result = match config.transport {
        TransportMode::Stdio => StdioTransport::new(executor).run().await,
        TransportMode::Http => {
            info!(
                addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                executor,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
