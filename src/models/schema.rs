//! Schema introspection records.

use schemars::JsonSchema;
use serde::Serialize;

/// One column of a table, as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    /// PostgreSQL type name, e.g. "integer", "character varying"
    pub data_type: String,
    /// "YES" or "NO"
    pub is_nullable: String,
}

impl ColumnInfo {
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable() {
        let col = ColumnInfo {
            column_name: "return_date".to_string(),
            data_type: "timestamp without time zone".to_string(),
            is_nullable: "YES".to_string(),
        };
        assert!(col.nullable());

        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["column_name"], "return_date");
        assert_eq!(json["is_nullable"], "YES");
    }
}
