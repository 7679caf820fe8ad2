//! Database access layer.
//!
//! This module provides:
//! - A connection factory (one fresh connection per operation, no pooling)
//! - Statement execution with scoped connection release
//! - Parameter binding
//! - Type mappings for converting rows to JSON

pub mod connection;
pub mod executor;
pub mod params;
pub mod types;

pub use connection::ConnectionFactory;
pub use executor::{QueryExecutor, QueryResult};
pub use params::QueryParam;
pub use types::{JsonRow, Numeric};
