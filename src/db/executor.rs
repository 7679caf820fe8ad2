//! Query execution engine.
//!
//! Each call opens a connection through the [`ConnectionFactory`], runs one
//! statement, fetches every row, and closes the connection again whether the
//! statement succeeded or not. Statements always go through the extended
//! (prepared) protocol, which only accepts a single statement per call.
//!
//! Multi-statement operations that must commit (rentals and returns) take a
//! raw connection with [`QueryExecutor::connect`] and hand it back with
//! [`QueryExecutor::release`].

use crate::db::connection::ConnectionFactory;
use crate::db::params::{QueryParam, bind_params};
use crate::db::types::{JsonRow, RowToJson};
use crate::error::DbResult;
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Connection, FromRow};
use std::time::Instant;
use tracing::debug;

/// Result of an ad-hoc query.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<JsonRow>,
    pub execution_time_ms: u64,
}

/// Query executor that handles database statement execution.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    factory: ConnectionFactory,
}

impl QueryExecutor {
    pub fn new(factory: ConnectionFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ConnectionFactory {
        &self.factory
    }

    /// Open a connection for a caller-managed transaction.
    pub async fn connect(&self) -> DbResult<PgConnection> {
        self.factory.connect().await
    }

    /// Close a connection obtained from [`QueryExecutor::connect`].
    pub async fn release(&self, conn: PgConnection) {
        self.factory.release(conn).await
    }

    /// Execute a statement and map every row into `T`.
    pub async fn fetch_all<T>(&self, sql: &str, params: &[QueryParam]) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let start = Instant::now();
        debug!(sql = %sql, params = params.len(), "Executing statement");

        let args = bind_params(params)?;
        let mut conn = self.factory.connect().await?;
        let result = sqlx::query_as_with::<_, T, _>(sql, args)
            .fetch_all(&mut conn)
            .await;
        self.factory.release(conn).await;

        let rows = result?;
        debug!(
            rows = rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Statement completed"
        );
        Ok(rows)
    }

    /// Execute a caller-supplied statement inside a read-only transaction
    /// and return the rows as column-ordered JSON maps.
    ///
    /// The transaction is always rolled back.
    pub async fn fetch_read_only(&self, sql: &str) -> DbResult<QueryResult> {
        let start = Instant::now();
        debug!(sql = %sql, "Executing read-only statement");

        let mut conn = self.factory.connect().await?;
        let result = fetch_in_read_only_transaction(&mut conn, sql).await;
        self.factory.release(conn).await;

        let rows = result?;
        let execution_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            rows = rows.len(),
            elapsed_ms = execution_time_ms,
            "Read-only statement completed"
        );

        Ok(QueryResult {
            columns: rows.first().map(|r| r.column_names()).unwrap_or_default(),
            rows: rows.iter().map(|r| r.to_json_map()).collect(),
            execution_time_ms,
        })
    }
}

async fn fetch_in_read_only_transaction(
    conn: &mut PgConnection,
    sql: &str,
) -> DbResult<Vec<PgRow>> {
    let mut tx = conn.begin().await?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query(sql).persistent(false).fetch_all(&mut *tx).await?;
    tx.rollback().await?;
    Ok(rows)
}
