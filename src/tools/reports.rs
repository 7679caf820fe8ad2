//! Revenue reporting tool.
//!
//! This module implements the `analyze_revenue` MCP tool. Totals are summed in
//! the database and returned as exact decimal strings.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::models::{CategoryRevenue, RevenueGrouping, RevenueRow, StoreRevenue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

const REVENUE_BY_CATEGORY_SQL: &str = "\
    SELECT c.name AS category, SUM(p.amount) AS revenue \
    FROM payment p \
    JOIN rental r ON p.rental_id = r.rental_id \
    JOIN inventory i ON r.inventory_id = i.inventory_id \
    JOIN film_category fc ON i.film_id = fc.film_id \
    JOIN category c ON fc.category_id = c.category_id \
    GROUP BY c.name \
    ORDER BY revenue DESC";

const REVENUE_BY_STORE_SQL: &str = "\
    SELECT s.store_id::int4 AS store_id, SUM(p.amount) AS revenue \
    FROM payment p \
    JOIN staff s ON p.staff_id = s.staff_id \
    GROUP BY s.store_id \
    ORDER BY revenue DESC";

fn default_by_category() -> bool {
    true
}

/// Input for the analyze_revenue tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeRevenueInput {
    /// Group by film category when true, by store when false. Default: true
    #[serde(default = "default_by_category")]
    pub by_category: bool,
}

/// Output from the analyze_revenue tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AnalyzeRevenueOutput {
    pub grouping: RevenueGrouping,
    /// Groups ordered by revenue, highest first
    pub rows: Vec<RevenueRow>,
    pub count: usize,
}

pub struct ReportToolHandler {
    executor: QueryExecutor,
}

impl ReportToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub async fn analyze_revenue(
        &self,
        input: AnalyzeRevenueInput,
    ) -> DbResult<AnalyzeRevenueOutput> {
        let grouping = RevenueGrouping::from_flag(input.by_category);

        let rows: Vec<RevenueRow> = match grouping {
            RevenueGrouping::Category => self
                .executor
                .fetch_all::<CategoryRevenue>(REVENUE_BY_CATEGORY_SQL, &[])
                .await?
                .into_iter()
                .map(RevenueRow::Category)
                .collect(),
            RevenueGrouping::Store => self
                .executor
                .fetch_all::<StoreRevenue>(REVENUE_BY_STORE_SQL, &[])
                .await?
                .into_iter()
                .map(RevenueRow::Store)
                .collect(),
        };

        info!(grouping = ?grouping, groups = rows.len(), "Analyzed revenue");

        Ok(AnalyzeRevenueOutput {
            grouping,
            count: rows.len(),
            rows,
        })
    }
}
