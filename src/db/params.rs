//! Parameter binding utilities for database queries.
//!
//! Catalog operations assemble their statements with positional `$n`
//! placeholders and a matching list of [`QueryParam`] values.

use crate::error::{DbError, DbResult};
use sqlx::Arguments;
use sqlx::postgres::PgArguments;

/// A parameter value for a catalog statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Null,
    Bool(bool),
    /// Matches INT4 identifier columns
    Int(i32),
    /// Used for LIMIT values
    BigInt(i64),
    Float(f64),
    Text(String),
}

impl QueryParam {
    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::BigInt(_) => "bigint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl From<i32> for QueryParam {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for QueryParam {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<String> for QueryParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for QueryParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Bind parameters, in order, into PostgreSQL arguments.
pub(crate) fn bind_params(params: &[QueryParam]) -> DbResult<PgArguments> {
    let mut args = PgArguments::default();
    for param in params {
        let bound = match param {
            QueryParam::Null => args.add(None::<String>),
            QueryParam::Bool(v) => args.add(*v),
            QueryParam::Int(v) => args.add(*v),
            QueryParam::BigInt(v) => args.add(*v),
            QueryParam::Float(v) => args.add(*v),
            QueryParam::Text(v) => args.add(v.clone()),
        };
        bound.map_err(|e| {
            DbError::internal(format!(
                "Failed to bind {} parameter: {}",
                param.type_name(),
                e
            ))
        })?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_conversions() {
        assert_eq!(QueryParam::from(7), QueryParam::Int(7));
        assert_eq!(QueryParam::from(7i64), QueryParam::BigInt(7));
        assert_eq!(QueryParam::from("drama"), QueryParam::Text("drama".into()));
    }

    #[test]
    fn test_bind_params_counts_arguments() {
        let params = vec![
            QueryParam::Int(1),
            QueryParam::Text("%love%".to_string()),
            QueryParam::BigInt(20),
            QueryParam::Null,
        ];
        let args = bind_params(&params).unwrap();
        assert_eq!(args.len(), 4);
    }
}
