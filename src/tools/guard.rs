//! Read-only guard for ad-hoc queries.
//!
//! The guard is a lexical check: after trimming whitespace the text must
//! begin with the keyword `select` (any case). It does not parse the
//! statement. Accepted text has its trailing statement separators removed and
//! a `LIMIT <n>` clause appended on its own line, so a trailing `--` comment
//! cannot swallow it.
//!
//! Single-statement execution is enforced by the executor (prepared
//! statements cannot carry more than one command) and the statement runs in
//! a read-only transaction; neither is the guard's concern.

use crate::error::{DbError, DbResult};

/// Row cap applied to ad-hoc queries when the caller does not give one.
pub const DEFAULT_SELECT_LIMIT: u32 = 50;

const SELECT_KEYWORD: &str = "select";

/// Check whether the text lexically starts with SELECT.
pub fn is_select(query: &str) -> bool {
    query
        .trim()
        .get(..SELECT_KEYWORD.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SELECT_KEYWORD))
}

/// Validate an ad-hoc query and bound its result size.
///
/// # Examples
///
/// ```
/// use dvdrental_mcp_server::tools::guard::guard_select;
///
/// let sql = guard_select("  select title from film; ", 10).unwrap();
/// assert_eq!(sql, "select title from film\nLIMIT 10");
///
/// assert!(guard_select("DELETE FROM film", 10).is_err());
/// ```
pub fn guard_select(query: &str, limit: u32) -> DbResult<String> {
    if !is_select(query) {
        return Err(DbError::input_rejected("Only SELECT queries are allowed"));
    }

    let body = query
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    Ok(format!("{body}\nLIMIT {limit}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_select_any_case() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("select 1"));
        assert!(is_select("SeLeCt 1"));
        assert!(is_select("\n\t  select 1"));
    }

    #[test]
    fn test_rejects_non_select() {
        for query in [
            "INSERT INTO film (title) VALUES ('x')",
            "update rental set return_date = now()",
            "delete from payment",
            "drop table film",
            "with x as (select 1) select * from x",
            "-- comment\nselect 1",
            "",
            "   ",
            "sel",
        ] {
            let err = guard_select(query, 50).unwrap_err();
            assert!(
                matches!(err, DbError::InputRejected { .. }),
                "expected rejection for {query:?}"
            );
        }
    }

    #[test]
    fn test_appends_limit() {
        assert_eq!(
            guard_select("SELECT * FROM film", DEFAULT_SELECT_LIMIT).unwrap(),
            "SELECT * FROM film\nLIMIT 50"
        );
        assert_eq!(guard_select("select 1", 0).unwrap(), "select 1\nLIMIT 0");
    }

    #[test]
    fn test_strips_trailing_separators() {
        for query in [
            "select * from film;",
            "select * from film ;",
            "select * from film;;",
            "select * from film; ; \n",
            "  select * from film  ",
        ] {
            assert_eq!(
                guard_select(query, 5).unwrap(),
                "select * from film\nLIMIT 5",
                "input {query:?}"
            );
        }
    }

    #[test]
    fn test_exactly_one_limit_clause() {
        let sql = guard_select("select title from film;", 7).unwrap();
        assert_eq!(sql.matches("LIMIT").count(), 1);
        assert!(sql.ends_with("\nLIMIT 7"));
    }

    #[test]
    fn test_limit_survives_trailing_line_comment() {
        let sql = guard_select("select g from generate_series(1, 1000) g -- all of them", 5).unwrap();
        assert_eq!(sql, "select g from generate_series(1, 1000) g -- all of them\nLIMIT 5");
        let last_line = sql.lines().last().unwrap();
        assert_eq!(last_line, "LIMIT 5");
    }

    #[test]
    fn test_non_ascii_prefix_is_rejected() {
        assert!(!is_select("sélect 1"));
        assert!(!is_select("ß"));
    }

    #[test]
    fn test_prefix_check_only() {
        // Lexical check only: a second statement is not detected here.
        assert!(guard_select("select 1; drop table x", 5).is_ok());
    }
}
