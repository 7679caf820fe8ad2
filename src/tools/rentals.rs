//! Rental tools.
//!
//! This module implements the `get_customer_history`, `rent_movie` and
//! `return_movie` MCP tools.
//!
//! Renting and returning are check-then-write sequences. Both run inside one
//! transaction on one connection and lock the row they check (`FOR UPDATE`),
//! so two concurrent rentals of the same inventory item serialize: the second
//! waits for the first to commit and then sees its open rental.

use crate::db::{QueryExecutor, QueryParam};
use crate::error::DbResult;
use crate::models::{RentalHistoryEntry, RentalOutcome};
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use sqlx::postgres::PgConnection;
use tracing::{debug, info};

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

const CUSTOMER_HISTORY_SQL: &str = "\
    SELECT r.rental_id, \
           r.rental_date::timestamp AS rental_date, \
           r.return_date::timestamp AS return_date, \
           f.title, \
           p.amount \
    FROM rental r \
    JOIN inventory i ON r.inventory_id = i.inventory_id \
    JOIN film f ON i.film_id = f.film_id \
    LEFT JOIN payment p ON r.rental_id = p.rental_id \
    WHERE r.customer_id = $1 \
    ORDER BY r.rental_date DESC \
    LIMIT $2";

const LOCK_INVENTORY_SQL: &str =
    "SELECT inventory_id FROM inventory WHERE inventory_id = $1 FOR UPDATE";

const OPEN_RENTAL_SQL: &str = "\
    SELECT rental_id FROM rental \
    WHERE inventory_id = $1 AND return_date IS NULL \
    LIMIT 1";

const INSERT_RENTAL_SQL: &str = "\
    INSERT INTO rental (rental_date, inventory_id, customer_id, staff_id) \
    VALUES (NOW(), $1, $2, $3) \
    RETURNING rental_id";

const LOCK_RENTAL_SQL: &str =
    "SELECT return_date::timestamp FROM rental WHERE rental_id = $1 FOR UPDATE";

const RETURN_RENTAL_SQL: &str = "UPDATE rental SET return_date = NOW() WHERE rental_id = $1";

fn default_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

/// Input for the get_customer_history tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCustomerHistoryInput {
    pub customer_id: i32,
    /// Maximum rentals to return. Default: 20
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Output from the get_customer_history tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetCustomerHistoryOutput {
    /// Rentals, most recent first
    pub rentals: Vec<RentalHistoryEntry>,
    pub count: usize,
}

/// Input for the rent_movie tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct RentMovieInput {
    pub customer_id: i32,
    pub inventory_id: i32,
    pub staff_id: i32,
}

/// Input for the return_movie tool.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct ReturnMovieInput {
    pub rental_id: i32,
}

pub struct RentalToolHandler {
    executor: QueryExecutor,
}

impl RentalToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    pub async fn get_customer_history(
        &self,
        input: GetCustomerHistoryInput,
    ) -> DbResult<GetCustomerHistoryOutput> {
        let rentals: Vec<RentalHistoryEntry> = self
            .executor
            .fetch_all(
                CUSTOMER_HISTORY_SQL,
                &[
                    QueryParam::Int(input.customer_id),
                    QueryParam::BigInt(input.limit as i64),
                ],
            )
            .await?;

        info!(
            customer_id = input.customer_id,
            count = rentals.len(),
            "Fetched customer history"
        );

        Ok(GetCustomerHistoryOutput {
            count: rentals.len(),
            rentals,
        })
    }

    /// Create an open rental unless the inventory item is already checked out.
    pub async fn rent_movie(&self, input: RentMovieInput) -> DbResult<RentalOutcome> {
        let mut conn = self.executor.connect().await?;
        let outcome = rent_in_transaction(&mut conn, input).await;
        self.executor.release(conn).await;
        let outcome = outcome?;

        info!(
            customer_id = input.customer_id,
            inventory_id = input.inventory_id,
            staff_id = input.staff_id,
            success = outcome.is_success(),
            rental_id = ?outcome.rental_id(),
            "Rent requested"
        );
        Ok(outcome)
    }

    /// Close an open rental by stamping its return date.
    pub async fn return_movie(&self, input: ReturnMovieInput) -> DbResult<RentalOutcome> {
        let mut conn = self.executor.connect().await?;
        let outcome = return_in_transaction(&mut conn, input.rental_id).await;
        self.executor.release(conn).await;
        let outcome = outcome?;

        info!(
            rental_id = input.rental_id,
            success = outcome.is_success(),
            "Return requested"
        );
        Ok(outcome)
    }
}

async fn rent_in_transaction(
    conn: &mut PgConnection,
    input: RentMovieInput,
) -> DbResult<RentalOutcome> {
    let mut tx = conn.begin().await?;

    let inventory: Option<(i32,)> = sqlx::query_as(LOCK_INVENTORY_SQL)
        .bind(input.inventory_id)
        .fetch_optional(&mut *tx)
        .await?;
    if inventory.is_none() {
        tx.rollback().await?;
        return Ok(RentalOutcome::InventoryNotFound {
            inventory_id: input.inventory_id,
        });
    }

    let open: Option<(i32,)> = sqlx::query_as(OPEN_RENTAL_SQL)
        .bind(input.inventory_id)
        .fetch_optional(&mut *tx)
        .await?;
    if let Some((open_rental_id,)) = open {
        debug!(open_rental_id, "Inventory item has an open rental");
        tx.rollback().await?;
        return Ok(RentalOutcome::AlreadyRentedOut {
            inventory_id: input.inventory_id,
        });
    }

    let (rental_id,): (i32,) = sqlx::query_as(INSERT_RENTAL_SQL)
        .bind(input.inventory_id)
        .bind(input.customer_id)
        .bind(input.staff_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(RentalOutcome::Rented { rental_id })
}

async fn return_in_transaction(conn: &mut PgConnection, rental_id: i32) -> DbResult<RentalOutcome> {
    let mut tx = conn.begin().await?;

    let rental: Option<(Option<NaiveDateTime>,)> = sqlx::query_as(LOCK_RENTAL_SQL)
        .bind(rental_id)
        .fetch_optional(&mut *tx)
        .await?;

    let outcome = match rental {
        None => RentalOutcome::RentalNotFound { rental_id },
        Some((Some(return_date),)) => RentalOutcome::AlreadyReturned {
            rental_id,
            return_date,
        },
        Some((None,)) => {
            sqlx::query(RETURN_RENTAL_SQL)
                .bind(rental_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(RentalOutcome::Returned { rental_id });
        }
    };

    tx.rollback().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_input_defaults_limit() {
        let input: GetCustomerHistoryInput =
            serde_json::from_value(serde_json::json!({ "customer_id": 1 })).unwrap();
        assert_eq!(input.customer_id, 1);
        assert_eq!(input.limit, 20);
    }

    #[test]
    fn test_rent_input_requires_all_ids() {
        let input: Result<RentMovieInput, _> =
            serde_json::from_value(serde_json::json!({ "customer_id": 1, "inventory_id": 2 }));
        assert!(input.is_err());
    }

    #[test]
    fn test_rent_locks_inventory_row() {
        assert!(LOCK_INVENTORY_SQL.ends_with("FOR UPDATE"));
        assert!(LOCK_RENTAL_SQL.ends_with("FOR UPDATE"));
        assert!(OPEN_RENTAL_SQL.contains("return_date IS NULL"));
    }

    #[test]
    fn test_history_ordering() {
        assert!(CUSTOMER_HISTORY_SQL.contains("LEFT JOIN payment p"));
        assert!(CUSTOMER_HISTORY_SQL.contains("ORDER BY r.rental_date DESC"));
    }
}
