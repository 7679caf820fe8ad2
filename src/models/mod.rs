//! Data models for the DVD rental MCP server.
//!
//! Records returned by catalog operations, plus the outcome type for the
//! rental mutations.

pub mod film;
pub mod rental;
pub mod revenue;
pub mod schema;

// Re-export commonly used types
pub use film::{AvailableInventory, FilmRecord};
pub use rental::{RentalHistoryEntry, RentalOutcome, RentalStatus, StatusKind};
pub use revenue::{CategoryRevenue, RevenueGrouping, RevenueRow, StoreRevenue};
pub use schema::ColumnInfo;
