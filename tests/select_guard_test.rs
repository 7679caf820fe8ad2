//! Tests for the read-only SELECT guard.
//!
//! None of these need a database: rejected statements must fail before a
//! connection is attempted, so the handler is pointed at a closed port.

use dvdrental_mcp_server::config::DatabaseConfig;
use dvdrental_mcp_server::db::{ConnectionFactory, QueryExecutor};
use dvdrental_mcp_server::error::DbError;
use dvdrental_mcp_server::tools::guard::{guard_select, is_select};
use dvdrental_mcp_server::tools::query::{QueryToolHandler, RunSelectQueryInput};
use std::time::Duration;

fn unreachable_handler() -> QueryToolHandler {
    QueryToolHandler::new(QueryExecutor::new(ConnectionFactory::new(DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        database: "dvdrental".to_string(),
        user: "postgres".to_string(),
        password: None,
        connect_timeout: Duration::from_secs(1),
    })))
}

#[tokio::test]
async fn test_write_statements_are_rejected() {
    let handler = unreachable_handler();

    for query in [
        "INSERT INTO rental (rental_date, inventory_id, customer_id, staff_id) VALUES (now(), 1, 1, 1)",
        "UPDATE film SET rental_rate = 0",
        "DELETE FROM payment",
        "DROP TABLE film",
        "TRUNCATE rental",
        "ALTER TABLE film ADD COLUMN x int",
        "CREATE TABLE x (id int)",
        "GRANT ALL ON film TO public",
    ] {
        let err = handler
            .run_select_query(RunSelectQueryInput {
                query: query.to_string(),
                limit: 50,
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, DbError::InputRejected { .. }),
            "expected rejection for {query:?}, got {err:?}"
        );
        assert_eq!(err.to_string(), "Query rejected: Only SELECT queries are allowed");
    }
}

#[tokio::test]
async fn test_leading_whitespace_and_case() {
    let handler = unreachable_handler();

    for query in ["   SELECT 1", "\nselect 1", "\tSeLeCt 1"] {
        let err = handler
            .run_select_query(RunSelectQueryInput {
                query: query.to_string(),
                limit: 50,
            })
            .await
            .unwrap_err();
        // Accepted by the guard, so it fails on the closed port instead.
        assert!(
            matches!(err, DbError::Connection { .. } | DbError::Timeout { .. }),
            "expected connection failure for {query:?}, got {err:?}"
        );
    }
}

#[test]
fn test_identifier_starting_with_select_is_accepted() {
    // The check is lexical; "selection" starts with "select".
    assert!(is_select("selection_of_rows"));
}

#[test]
fn test_statement_separator_and_limit() {
    assert_eq!(
        guard_select("SELECT title FROM film WHERE film_id = 1;", 1).unwrap(),
        "SELECT title FROM film WHERE film_id = 1\nLIMIT 1"
    );
    assert_eq!(
        guard_select("select count(*) from rental ;\n", 50).unwrap(),
        "select count(*) from rental\nLIMIT 50"
    );
}

#[test]
fn test_limit_is_outside_trailing_comment() {
    let sql = guard_select("SELECT * FROM film -- every film;", 3).unwrap();
    assert_eq!(sql.lines().last(), Some("LIMIT 3"));
    assert_eq!(sql.matches("LIMIT").count(), 1);
}

#[test]
fn test_unicode_input_does_not_panic() {
    for query in ["🎬", "sé", "ｓｅｌｅｃｔ 1", "select✓"] {
        let _ = guard_select(query, 10);
    }
    assert!(guard_select("select✓", 10).is_ok());
    assert!(guard_select("ｓｅｌｅｃｔ 1", 10).is_err());
}
