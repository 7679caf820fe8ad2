//! Error types for the DVD rental MCP server.
//!
//! Every failure that aborts an operation is a `DbError`. Domain conflicts
//! (item already rented, rental already returned, ...) are not errors; they
//! travel back to the caller as a [`crate::models::RentalStatus`] value.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Query rejected: {message}")]
    InputRejected { message: String },

    #[error("Database error: {message}")]
    Query {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an input rejection (statement refused before execution).
    pub fn input_rejected(message: impl Into<String>) -> Self {
        Self::InputRejected {
            message: message.into(),
        }
    }

    /// Create a query error with optional SQL state.
    pub fn query(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            Self::Configuration { .. } => {
                Some("Set PG_HOST and PG_DB (and optionally PG_PORT, PG_USER, PG_PASSWORD)")
            }
            Self::InputRejected { .. } => Some("Only statements starting with SELECT are accepted"),
            _ => None,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// Database-side rejections keep the server's own message untouched.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::configuration(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::query(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::RowNotFound => DbError::query(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DbError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DbError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::TypeNotFound { type_name } => DbError::query(
                format!("Type not found: {}", type_name),
                None,
                "Check the column types referenced by the statement",
            ),
            sqlx::Error::ColumnNotFound(col) => DbError::query(
                format!("Column not found: {}", col),
                None,
                "Check the selected column names",
            ),
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert DbError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::InputRejected { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }

            // Database errors -> invalid_params with sql_state in message
            DbError::Query {
                message,
                sql_state,
                suggestion,
            } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, suggestion_data(Some(suggestion)))
            }

            DbError::Configuration { .. } | DbError::Connection { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
            DbError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some("Check that the database server is reachable")),
            ),
            DbError::Internal { .. } => rmcp::ErrorData::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::connection("Failed to connect", "Check credentials");
        assert!(err.to_string().contains("Connection failed"));

        let err = DbError::input_rejected("Only SELECT queries are allowed");
        assert_eq!(
            err.to_string(),
            "Query rejected: Only SELECT queries are allowed"
        );
    }

    #[test]
    fn test_error_suggestion() {
        let err = DbError::query("Syntax error", Some("42601".to_string()), "Check SQL syntax");
        assert_eq!(err.suggestion(), Some("Check SQL syntax"));
        assert!(DbError::internal("boom").suggestion().is_none());
    }

    #[test]
    fn test_input_rejected_maps_to_invalid_params() {
        let mcp_err: rmcp::ErrorData = DbError::input_rejected("nope").into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_query_error_includes_sql_state() {
        let err = DbError::query("syntax error", Some("42601".to_string()), "check syntax");
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("42601"));
        assert!(mcp_err.message.contains("syntax error"));
    }

    #[test]
    fn test_query_error_keeps_database_message() {
        let err = DbError::query(
            "relation \"filmz\" does not exist",
            Some("42P01".to_string()),
            "check objects",
        );
        let mcp_err: rmcp::ErrorData = err.into();
        assert!(mcp_err.message.contains("relation \"filmz\" does not exist"));
    }

    #[test]
    fn test_connection_maps_to_internal_error() {
        let mcp_err: rmcp::ErrorData = DbError::connection("failed", "try reconnecting").into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "try reconnecting");
    }

    #[test]
    fn test_configuration_maps_to_internal_error() {
        let mcp_err: rmcp::ErrorData = DbError::configuration("PG_HOST is not set").into();
        assert_eq!(mcp_err.code.0, -32603);
        assert!(mcp_err.data.is_some());
    }

    #[test]
    fn test_timeout_maps_to_internal_error() {
        let mcp_err: rmcp::ErrorData = DbError::timeout("connect", 10).into();
        assert_eq!(mcp_err.code.0, -32603);
        assert!(mcp_err.message.contains("10s"));
    }
}
