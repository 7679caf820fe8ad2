//! Ad-hoc query tool.
//!
//! This module implements the `run_select_query` MCP tool. Caller-supplied
//! text must pass the read-only guard before anything reaches the database.

use crate::db::{JsonRow, QueryExecutor};
use crate::error::DbResult;
use crate::tools::guard::{DEFAULT_SELECT_LIMIT, guard_select};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

fn default_limit() -> u32 {
    DEFAULT_SELECT_LIMIT
}

/// Input for the run_select_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunSelectQueryInput {
    /// SQL text starting with SELECT. Other statements are rejected.
    pub query: String,
    /// Row cap appended as `LIMIT <n>`. Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Output from the run_select_query tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RunSelectQueryOutput {
    /// Column names in result order. Empty when no rows were returned.
    pub columns: Vec<String>,
    /// Result rows as column-name to value maps
    pub rows: Vec<JsonRow>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

pub struct QueryToolHandler {
    executor: QueryExecutor,
}

impl QueryToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub async fn run_select_query(
        &self,
        input: RunSelectQueryInput,
    ) -> DbResult<RunSelectQueryOutput> {
        let sql = guard_select(&input.query, input.limit)?;
        let result = self.executor.fetch_read_only(&sql).await?;

        info!(
            row_count = result.rows.len(),
            limit = input.limit,
            execution_time_ms = result.execution_time_ms,
            "Ad-hoc query executed"
        );

        Ok(RunSelectQueryOutput {
            row_count: result.rows.len(),
            columns: result.columns,
            rows: result.rows,
            execution_time_ms: result.execution_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::ConnectionFactory;
    use crate::error::DbError;
    use std::time::Duration;

    fn unreachable_executor() -> QueryExecutor {
        QueryExecutor::new(ConnectionFactory::new(DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            database: "dvdrental".to_string(),
            user: "postgres".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(1),
        }))
    }

    #[test]
    fn test_input_defaults_limit() {
        let input: RunSelectQueryInput =
            serde_json::from_value(serde_json::json!({ "query": "select 1" })).unwrap();
        assert_eq!(input.limit, 50);
    }

    #[test]
    fn test_input_rejects_negative_limit() {
        let input: Result<RunSelectQueryInput, _> =
            serde_json::from_value(serde_json::json!({ "query": "select 1", "limit": -1 }));
        assert!(input.is_err());
    }

    #[tokio::test]
    async fn test_rejects_before_touching_database() {
        // The executor points at a closed port; a rejection proves no
        // connection was attempted.
        let handler = QueryToolHandler::new(unreachable_executor());
        let err = handler
            .run_select_query(RunSelectQueryInput {
                query: "DROP TABLE film".to_string(),
                limit: 50,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InputRejected { .. }));
    }

    #[tokio::test]
    async fn test_accepted_query_reaches_connection_factory() {
        let handler = QueryToolHandler::new(unreachable_executor());
        let err = handler
            .run_select_query(RunSelectQueryInput {
                query: "select 1".to_string(),
                limit: 50,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Connection { .. } | DbError::Timeout { .. }
        ));
    }
}
