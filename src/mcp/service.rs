//! MCP service implementation using rmcp.
//!
//! This module defines the DvdRentalService struct with all DVD rental tools
//! exposed via the MCP protocol using the rmcp framework's macros.

use crate::db::QueryExecutor;
use crate::models::RentalStatus;
use crate::tools::films::{
    FilmToolHandler, GetAvailableInventoryInput, GetAvailableInventoryOutput, SearchMoviesInput,
    SearchMoviesOutput,
};
use crate::tools::query::{QueryToolHandler, RunSelectQueryInput, RunSelectQueryOutput};
use crate::tools::rentals::{
    GetCustomerHistoryInput, GetCustomerHistoryOutput, RentMovieInput, RentalToolHandler,
    ReturnMovieInput,
};
use crate::tools::reports::{AnalyzeRevenueInput, AnalyzeRevenueOutput, ReportToolHandler};
use crate::tools::schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesInput, ListTablesOutput, SchemaToolHandler,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

#[derive(Clone)]
pub struct DvdRentalService {
    /// Opens one connection per tool call
    executor: QueryExecutor,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl DvdRentalService {
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            executor,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl DvdRentalService {
    #[tool(description = "List the tables in a schema (default: public), alphabetically.")]
    async fn list_tables(
        &self,
        Parameters(input): Parameters<ListTablesInput>,
    ) -> Result<Json<ListTablesOutput>, McpError> {
        SchemaToolHandler::new(self.executor.clone())
            .list_tables(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Describe a table's columns in physical order.\nReturns column name, data type, and nullability. Unknown tables return no columns."
    )]
    async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<Json<DescribeTableOutput>, McpError> {
        SchemaToolHandler::new(self.executor.clone())
            .describe_table(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Run a read-only SELECT query.\nThe text must start with SELECT; anything else is rejected without touching the database.\nA `LIMIT <limit>` clause (default 50) is appended, so do not include your own LIMIT.\nRuns as a single statement in a read-only transaction."
    )]
    async fn run_select_query(
        &self,
        Parameters(input): Parameters<RunSelectQueryInput>,
    ) -> Result<Json<RunSelectQueryOutput>, McpError> {
        QueryToolHandler::new(self.executor.clone())
            .run_select_query(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Search films by title/description text, genre, and release year.\nAll filters are optional, case-insensitive substring matches (year is exact), and combined with AND.\nResults are ordered by title. Default limit: 20."
    )]
    async fn search_movies(
        &self,
        Parameters(input): Parameters<SearchMoviesInput>,
    ) -> Result<Json<SearchMoviesOutput>, McpError> {
        FilmToolHandler::new(self.executor.clone())
            .search_movies(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Get a customer's rental history, most recent first.\nIncludes film title, rental and return dates, and the payment amount when one exists. Default limit: 20."
    )]
    async fn get_customer_history(
        &self,
        Parameters(input): Parameters<GetCustomerHistoryInput>,
    ) -> Result<Json<GetCustomerHistoryOutput>, McpError> {
        RentalToolHandler::new(self.executor.clone())
            .get_customer_history(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Rent an inventory item to a customer.\nFails with a conflict status if the item is already rented out or does not exist.\nReturns the new rental_id on success."
    )]
    async fn rent_movie(
        &self,
        Parameters(input): Parameters<RentMovieInput>,
    ) -> Result<Json<RentalStatus>, McpError> {
        RentalToolHandler::new(self.executor.clone())
            .rent_movie(input)
            .await
            .map(|outcome| Json(RentalStatus::from(outcome)))
            .map_err(McpError::from)
    }

    #[tool(
        description = "Return a rented item by rental_id.\nFails with a conflict status if the rental does not exist or was already returned."
    )]
    async fn return_movie(
        &self,
        Parameters(input): Parameters<ReturnMovieInput>,
    ) -> Result<Json<RentalStatus>, McpError> {
        RentalToolHandler::new(self.executor.clone())
            .return_movie(input)
            .await
            .map(|outcome| Json(RentalStatus::from(outcome)))
            .map_err(McpError::from)
    }

    #[tool(
        description = "List the copies of a film that are currently in stock (no open rental), with their store."
    )]
    async fn get_available_inventory(
        &self,
        Parameters(input): Parameters<GetAvailableInventoryInput>,
    ) -> Result<Json<GetAvailableInventoryOutput>, McpError> {
        FilmToolHandler::new(self.executor.clone())
            .get_available_inventory(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Total payment revenue grouped by film category (by_category: true, default) or by store (by_category: false), highest first.\nAmounts are exact decimal strings."
    )]
    async fn analyze_revenue(
        &self,
        Parameters(input): Parameters<AnalyzeRevenueInput>,
    ) -> Result<Json<AnalyzeRevenueOutput>, McpError> {
        ReportToolHandler::new(self.executor.clone())
            .analyze_revenue(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }
}

#[tool_handler]
impl ServerHandler for DvdRentalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dvdrental-mcp-server".to_owned(),
                title: Some("DVD Rental MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for the PostgreSQL DVD rental sample database.\n\
                \n\
                ## Exploring\n\
                - `list_tables` and `describe_table` show the schema\n\
                - `run_select_query` runs a read-only SELECT; the server appends the LIMIT\n\
                \n\
                ## Catalog\n\
                - `search_movies` finds films; `get_available_inventory` lists in-stock copies\n\
                \n\
                ## Rentals\n\
                1. Find an in-stock `inventory_id` with `get_available_inventory`\n\
                2. `rent_movie` with customer_id, inventory_id, staff_id\n\
                3. `return_movie` with the returned rental_id\n\
                Both report `status: success` or `status: conflict` with a message.\n\
                \n\
                ## Reporting\n\
                - `get_customer_history` and `analyze_revenue`"
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::ConnectionFactory;
    use std::time::Duration;

    fn create_test_service() -> DvdRentalService {
        DvdRentalService::new(QueryExecutor::new(ConnectionFactory::new(DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "dvdrental".to_string(),
            user: "postgres".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(1),
        })))
    }

    #[test]
    fn test_service_creation() {
        let _service = create_test_service();
    }

    #[test]
    fn test_all_tools_registered() {
        let service = create_test_service();
        let mut names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "analyze_revenue",
                "describe_table",
                "get_available_inventory",
                "get_customer_history",
                "list_tables",
                "rent_movie",
                "return_movie",
                "run_select_query",
                "search_movies",
            ]
        );
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "dvdrental-mcp-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
