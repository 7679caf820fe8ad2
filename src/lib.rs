//! DVD Rental MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to browse and operate the PostgreSQL DVD rental sample database: schema
//! introspection, guarded read-only queries, film search, rentals and
//! returns, and revenue reporting.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::DvdRentalService;
