//! MCP tool implementations.
//!
//! This module contains all DVD rental tool handlers:
//! - `schema`: `list_tables`, `describe_table`
//! - `query`: `run_select_query` behind the read-only `guard`
//! - `films`: `search_movies`, `get_available_inventory`
//! - `rentals`: `get_customer_history`, `rent_movie`, `return_movie`
//! - `reports`: `analyze_revenue`

pub mod films;
pub mod guard;
pub mod query;
pub mod rentals;
pub mod reports;
pub mod schema;

pub use films::{
    FilmToolHandler, GetAvailableInventoryInput, GetAvailableInventoryOutput, SearchMoviesInput,
    SearchMoviesOutput,
};
pub use query::{QueryToolHandler, RunSelectQueryInput, RunSelectQueryOutput};
pub use rentals::{
    GetCustomerHistoryInput, GetCustomerHistoryOutput, RentMovieInput, RentalToolHandler,
    ReturnMovieInput,
};
pub use reports::{AnalyzeRevenueInput, AnalyzeRevenueOutput, ReportToolHandler};
pub use schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesInput, ListTablesOutput, SchemaToolHandler,
};
