//! Revenue aggregation records.

use crate::db::Numeric;
use schemars::JsonSchema;
use serde::Serialize;

/// How payments are grouped by `analyze_revenue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RevenueGrouping {
    Category,
    Store,
}

impl RevenueGrouping {
    pub fn from_flag(by_category: bool) -> Self {
        if by_category { Self::Category } else { Self::Store }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct StoreRevenue {
    pub store_id: i32,
    pub revenue: Numeric,
}

/// One aggregate row; serialized as the inner record.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum RevenueRow {
    Category(CategoryRevenue),
    Store(StoreRevenue),
}

impl RevenueRow {
    pub fn revenue(&self) -> &Numeric {
        match self {
            Self::Category(row) => &row.revenue,
            Self::Store(row) => &row.revenue,
        }
    }
}
