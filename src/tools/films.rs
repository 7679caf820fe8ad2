//! Film search and inventory availability tools.
//!
//! This module implements the `search_movies` and `get_available_inventory`
//! MCP tools.

use crate::db::{QueryExecutor, QueryParam};
use crate::error::DbResult;
use crate::models::{AvailableInventory, FilmRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

const SEARCH_BASE_SQL: &str = "\
    SELECT f.film_id, \
           f.title, \
           c.name AS genre, \
           f.release_year::int4 AS release_year, \
           f.rental_rate, \
           f.rating::text AS rating, \
           f.description \
    FROM film f \
    JOIN film_category fc ON f.film_id = fc.film_id \
    JOIN category c ON fc.category_id = c.category_id";

const AVAILABLE_INVENTORY_SQL: &str = "\
    SELECT i.inventory_id, i.store_id::int4 AS store_id \
    FROM inventory i \
    WHERE i.film_id = $1 \
      AND NOT EXISTS ( \
          SELECT 1 FROM rental r \
          WHERE r.inventory_id = i.inventory_id AND r.return_date IS NULL \
      ) \
    ORDER BY i.inventory_id";

fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

/// Input for the search_movies tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchMoviesInput {
    /// Case-insensitive substring matched against title or description
    #[serde(default)]
    pub search_term: Option<String>,
    /// Case-insensitive substring matched against the category name
    #[serde(default)]
    pub genre: Option<String>,
    /// Exact release year
    #[serde(default)]
    pub year: Option<i32>,
    /// Maximum films to return. Default: 20
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Output from the search_movies tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchMoviesOutput {
    /// Matching films ordered by title
    pub films: Vec<FilmRecord>,
    pub count: usize,
}

/// Input for the get_available_inventory tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAvailableInventoryInput {
    pub film_id: i32,
}

/// Output from the get_available_inventory tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetAvailableInventoryOutput {
    /// Copies of the film not currently checked out
    pub inventory: Vec<AvailableInventory>,
    pub count: usize,
}

/// Escape LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Treat empty or blank filter strings as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the conjunctive film search statement and its parameters.
pub fn build_search_query(input: &SearchMoviesInput) -> (String, Vec<QueryParam>) {
    let mut sql = String::from(SEARCH_BASE_SQL);
    let mut params: Vec<QueryParam> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();

    if let Some(term) = non_blank(input.search_term.as_deref()) {
        params.push(QueryParam::Text(like_pattern(term)));
        let n = params.len();
        conditions.push(format!("(f.title ILIKE ${n} OR f.description ILIKE ${n})"));
    }

    if let Some(genre) = non_blank(input.genre.as_deref()) {
        params.push(QueryParam::Text(like_pattern(genre)));
        conditions.push(format!("c.name ILIKE ${}", params.len()));
    }

    if let Some(year) = input.year {
        params.push(QueryParam::Int(year));
        conditions.push(format!("f.release_year = ${}", params.len()));
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    params.push(QueryParam::BigInt(input.limit as i64));
    sql.push_str(&format!(" ORDER BY f.title LIMIT ${}", params.len()));

    (sql, params)
}

pub struct FilmToolHandler {
    executor: QueryExecutor,
}

impl FilmToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub async fn search_movies(&self, input: SearchMoviesInput) -> DbResult<SearchMoviesOutput> {
        let (sql, params) = build_search_query(&input);
        let films: Vec<FilmRecord> = self.executor.fetch_all(&sql, &params).await?;

        info!(
            params = params.len(),
            count = films.len(),
            "Searched films"
        );

        Ok(SearchMoviesOutput {
            count: films.len(),
            films,
        })
    }

    pub async fn get_available_inventory(
        &self,
        input: GetAvailableInventoryInput,
    ) -> DbResult<GetAvailableInventoryOutput> {
        let inventory: Vec<AvailableInventory> = self
            .executor
            .fetch_all(AVAILABLE_INVENTORY_SQL, &[QueryParam::Int(input.film_id)])
            .await?;

        info!(
            film_id = input.film_id,
            available = inventory.len(),
            "Looked up available inventory"
        );

        Ok(GetAvailableInventoryOutput {
            count: inventory.len(),
            inventory,
        })
    }
}
