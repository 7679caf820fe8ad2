//! Rental records and rental mutation outcomes.
//!
//! `rent_movie` and `return_movie` report domain conflicts as ordinary
//! results. A [`RentalOutcome`] tells the caller which case occurred and
//! renders the human-readable status line; [`RentalStatus`] is the
//! serialized form handed back through the tool interface.

use crate::db::Numeric;
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::Serialize;

/// One entry in a customer's rental history.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct RentalHistoryEntry {
    pub rental_id: i32,
    #[schemars(with = "String")]
    pub rental_date: NaiveDateTime,
    /// Null while the item is still checked out
    #[schemars(with = "Option<String>")]
    pub return_date: Option<NaiveDateTime>,
    pub title: String,
    /// Payment amount, absent when no payment was recorded
    pub amount: Option<Numeric>,
}

/// Result of a rental mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalOutcome {
    Rented { rental_id: i32 },
    Returned { rental_id: i32 },
    AlreadyRentedOut { inventory_id: i32 },
    InventoryNotFound { inventory_id: i32 },
    RentalNotFound { rental_id: i32 },
    AlreadyReturned {
        rental_id: i32,
        return_date: NaiveDateTime,
    },
}

impl RentalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Rented { .. } | Self::Returned { .. })
    }

    /// The rental this outcome refers to, if any.
    pub fn rental_id(&self) -> Option<i32> {
        match self {
            Self::Rented { rental_id }
            | Self::Returned { rental_id }
            | Self::RentalNotFound { rental_id }
            | Self::AlreadyReturned { rental_id, .. } => Some(*rental_id),
            Self::AlreadyRentedOut { .. } | Self::InventoryNotFound { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Rented { rental_id } => format!("Successfully rented. Rental ID: {rental_id}"),
            Self::Returned { rental_id } => format!("Successfully returned rental {rental_id}."),
            Self::AlreadyRentedOut { inventory_id } => {
                format!("Error: Inventory item {inventory_id} is already rented out.")
            }
            Self::InventoryNotFound { inventory_id } => {
                format!("Error: Inventory item {inventory_id} not found.")
            }
            Self::RentalNotFound { rental_id } => {
                format!("Error: Rental ID {rental_id} not found.")
            }
            Self::AlreadyReturned {
                rental_id,
                return_date,
            } => format!("Error: Rental ID {rental_id} already returned on {return_date}."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Conflict,
}

/// Status returned by `rent_movie` and `return_movie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RentalStatus {
    /// "success", or "conflict" when a business rule prevented the change
    pub status: StatusKind,
    /// Human-readable status line
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_id: Option<i32>,
}

impl From<RentalOutcome> for RentalStatus {
    fn from(outcome: RentalOutcome) -> Self {
        Self {
            status: if outcome.is_success() {
                StatusKind::Success
            } else {
                StatusKind::Conflict
            },
            message: outcome.message(),
            rental_id: outcome.rental_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_rented_status() {
        let status = RentalStatus::from(RentalOutcome::Rented { rental_id: 16050 });
        assert_eq!(status.status, StatusKind::Success);
        assert_eq!(status.message, "Successfully rented. Rental ID: 16050");
        assert_eq!(status.rental_id, Some(16050));
    }

    #[test]
    fn test_already_rented_out_is_conflict() {
        let status = RentalStatus::from(RentalOutcome::AlreadyRentedOut { inventory_id: 9 });
        assert_eq!(status.status, StatusKind::Conflict);
        assert!(status.message.contains("already rented out"));
        assert_eq!(status.rental_id, None);
    }

    #[test]
    fn test_already_returned_message_includes_date() {
        let return_date = NaiveDate::from_ymd_opt(2005, 5, 26)
            .unwrap()
            .and_hms_opt(22, 4, 30)
            .unwrap();
        let outcome = RentalOutcome::AlreadyReturned {
            rental_id: 1,
            return_date,
        };
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.message(),
            "Error: Rental ID 1 already returned on 2005-05-26 22:04:30."
        );
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            RentalOutcome::RentalNotFound { rental_id: 42 }.message(),
            "Error: Rental ID 42 not found."
        );
        assert_eq!(
            RentalOutcome::InventoryNotFound { inventory_id: 7 }.message(),
            "Error: Inventory item 7 not found."
        );
    }

    #[test]
    fn test_status_serialization() {
        let status = RentalStatus::from(RentalOutcome::Returned { rental_id: 5 });
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Successfully returned rental 5.");
        assert_eq!(json["rental_id"], 5);

        let status = RentalStatus::from(RentalOutcome::AlreadyRentedOut { inventory_id: 3 });
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "conflict");
        assert!(json.get("rental_id").is_none());
    }
}
