//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `describe_table` MCP tools.

use crate::db::{QueryExecutor, QueryParam};
use crate::error::DbResult;
use crate::models::ColumnInfo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_SCHEMA: &str = "public";

const LIST_TABLES_SQL: &str = "\
    SELECT table_name::text \
    FROM information_schema.tables \
    WHERE table_schema = $1 \
    ORDER BY table_name";

const DESCRIBE_TABLE_SQL: &str = "\
    SELECT column_name::text AS column_name, \
           data_type::text AS data_type, \
           is_nullable::text AS is_nullable \
    FROM information_schema.columns \
    WHERE table_schema = $1 AND table_name = $2 \
    ORDER BY ordinal_position";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Schema to list. Default: "public"
    #[serde(default = "default_schema")]
    pub schema: String,
}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    /// Table names in alphabetical order
    pub tables: Vec<String>,
    pub count: usize,
}

/// Input for the describe_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableInput {
    /// Table name
    pub table_name: String,
    /// Schema containing the table. Default: "public"
    #[serde(default = "default_schema")]
    pub schema: String,
}

/// Output from the describe_table tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DescribeTableOutput {
    /// Columns in physical order. Empty if the table does not exist.
    pub columns: Vec<ColumnInfo>,
    pub count: usize,
}

pub struct SchemaToolHandler {
    executor: QueryExecutor,
}

impl SchemaToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub async fn list_tables(&self, input: ListTablesInput) -> DbResult<ListTablesOutput> {
        let tables: Vec<(String,)> = self
            .executor
            .fetch_all(LIST_TABLES_SQL, &[QueryParam::from(input.schema.as_str())])
            .await?;
        let tables: Vec<String> = tables.into_iter().map(|(name,)| name).collect();

        info!(schema = %input.schema, count = tables.len(), "Listed tables");

        Ok(ListTablesOutput {
            count: tables.len(),
            tables,
        })
    }

    pub async fn describe_table(&self, input: DescribeTableInput) -> DbResult<DescribeTableOutput> {
        let columns: Vec<ColumnInfo> = self
            .executor
            .fetch_all(
                DESCRIBE_TABLE_SQL,
                &[
                    QueryParam::from(input.schema.as_str()),
                    QueryParam::from(input.table_name.as_str()),
                ],
            )
            .await?;

        info!(
            schema = %input.schema,
            table = %input.table_name,
            columns = columns.len(),
            "Described table"
        );

        Ok(DescribeTableOutput {
            count: columns.len(),
            columns,
        })
    }
}
