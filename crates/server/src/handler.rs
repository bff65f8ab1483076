//! Tool registration for the sdamgia MCP server.
use crate::tools::{
    CatalogGetParams, CategoryGetParams, ProblemGetParams, ProblemRandomParams, ProblemSearchImageParams,
    ProblemSearchParams, TestGenerateParams, TestGetParams, TestPdfParams, catalog_get_impl, category_get_impl,
    problem_get_impl, problem_random_impl, problem_search_image_impl, problem_search_impl, test_generate_impl,
    test_get_impl, test_pdf_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use sdamgia_client::SdamClient;
use std::sync::Arc;

/// Exposes one [`SdamClient`] as nine MCP tools.
#[derive(Clone)]
pub struct SdamgiaServer {
    client: Arc<SdamClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SdamgiaServer {
    pub fn new(client: SdamClient) -> Self {
        Self { client: Arc::new(client), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Fetch one sdamgia problem by id: condition, solution, answer, analogs and image URLs. Optionally render it to an image file."
    )]
    async fn problem_get(&self, params: Parameters<ProblemGetParams>) -> Result<CallToolResult, McpError> {
        problem_get_impl(&self.client, params.0).await
    }

    #[tool(description = "Full-text search for problems. Returns problem ids for one result page.")]
    async fn problem_search(&self, params: Parameters<ProblemSearchParams>) -> Result<CallToolResult, McpError> {
        problem_search_impl(&self.client, params.0).await
    }

    #[tool(description = "List the topics and categories of a subject's problem catalog.")]
    async fn catalog_get(&self, params: Parameters<CatalogGetParams>) -> Result<CallToolResult, McpError> {
        catalog_get_impl(&self.client, params.0).await
    }

    #[tool(description = "List problem ids on one page of a catalog category, newest first.")]
    async fn category_get(&self, params: Parameters<CategoryGetParams>) -> Result<CallToolResult, McpError> {
        category_get_impl(&self.client, params.0).await
    }

    #[tool(description = "List the problem ids of a generated test.")]
    async fn test_get(&self, params: Parameters<TestGetParams>) -> Result<CallToolResult, McpError> {
        test_get_impl(&self.client, params.0).await
    }

    #[tool(
        description = "Generate a test, either N problems for every catalog topic or explicit counts per topic number. Returns the test id."
    )]
    async fn test_generate(&self, params: Parameters<TestGenerateParams>) -> Result<CallToolResult, McpError> {
        test_generate_impl(&self.client, params.0).await
    }

    #[tool(description = "Get the URL of a printable PDF for a test, with optional solutions, answers and criteria.")]
    async fn test_pdf(&self, params: Parameters<TestPdfParams>) -> Result<CallToolResult, McpError> {
        test_pdf_impl(&self.client, params.0).await
    }

    #[tool(
        description = "Pick a random problem of a catalog topic, preferring ones added within period_days. Pass a seed for a reproducible pick."
    )]
    async fn problem_random(&self, params: Parameters<ProblemRandomParams>) -> Result<CallToolResult, McpError> {
        problem_random_impl(&self.client, params.0).await
    }

    #[tool(description = "Recognize the text in a picture of a problem and search for matching problem ids.")]
    async fn problem_search_image(
        &self, params: Parameters<ProblemSearchImageParams>,
    ) -> Result<CallToolResult, McpError> {
        problem_search_image_impl(&self.client, params.0).await
    }
}

impl ServerHandler for SdamgiaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-sdamgia".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Tools for the sdamgia.ru exam problem bank. Every tool takes a subject code such as math, phys or rus."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
