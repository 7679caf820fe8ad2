//! Film and inventory records.

use crate::db::Numeric;
use schemars::JsonSchema;
use serde::Serialize;

/// A film matched by a search, with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct FilmRecord {
    pub film_id: i32,
    pub title: String,
    /// Category name
    pub genre: String,
    pub release_year: Option<i32>,
    /// Exact decimal, e.g. "4.99"
    pub rental_rate: Numeric,
    /// MPAA rating label, e.g. "PG-13"
    pub rating: Option<String>,
    pub description: Option<String>,
}

/// An inventory copy of a film that is not currently checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct AvailableInventory {
    pub inventory_id: i32,
    pub store_id: i32,
}
