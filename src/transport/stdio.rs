//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::mcp::DvdRentalService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};

/// Reads JSON-RPC messages from stdin and writes responses to stdout.
pub struct StdioTransport {
    executor: QueryExecutor,
}

impl StdioTransport {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = DvdRentalService::new(self.executor.clone());
        let running_service = service
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {}", e)))?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DbError::internal(format!("Stdio transport error: {}", e)));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received");
                true
            }
        };

        if shutdown_requested {
            // A blocking stdin read cannot be interrupted; connections are
            // per call, so there is nothing left to close.
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::ConnectionFactory;
    use std::time::Duration;

    #[test]
    fn test_stdio_transport_creation() {
        let executor = QueryExecutor::new(ConnectionFactory::new(DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "dvdrental".to_string(),
            user: "postgres".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(1),
        }));
        let transport = StdioTransport::new(executor);
        assert_eq!(transport.name(), "stdio");
    }
}
