//! Tools that return lists of problem ids: problem_search, category_get,
//! test_get and problem_search_image.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use sdamgia_client::SdamClient;
use sdamgia_core::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{default_page, json_result, require, require_page};

/// Output structure shared by the listing tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemIdsOutput {
    pub subject: String,
    /// Problem ids in page order.
    pub ids: Vec<String>,
    pub count: usize,
}

impl ProblemIdsOutput {
    fn new(subject: String, ids: Vec<String>) -> Self {
        Self { subject, count: ids.len(), ids }
    }
}

/// Input parameters for problem_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemSearchParams {
    /// Subject code.
    pub subject: String,
    /// Search phrase.
    pub query: String,
    /// Result page, starting at 1.
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Implementation of the problem_search tool.
pub async fn problem_search_impl(client: &SdamClient, params: ProblemSearchParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("query", &params.query)?;
    require_page(params.page)?;

    let ids = client.search(&params.subject, &params.query, params.page).await?;
    Ok(json_result(&ProblemIdsOutput::new(params.subject, ids)))
}

/// Input parameters for category_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryGetParams {
    /// Subject code.
    pub subject: String,
    /// Category id from the catalog.
    pub category_id: String,
    /// Listing page, starting at 1. Newer problems come first.
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Implementation of the category_get tool.
pub async fn category_get_impl(client: &SdamClient, params: CategoryGetParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("category_id", &params.category_id)?;
    require_page(params.page)?;

    let ids = client
        .get_category_by_id(&params.subject, &params.category_id, params.page)
        .await?;
    Ok(json_result(&ProblemIdsOutput::new(params.subject, ids)))
}

/// Input parameters for test_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TestGetParams {
    /// Subject code.
    pub subject: String,
    /// Test id.
    pub test_id: String,
}

/// Implementation of the test_get tool.
pub async fn test_get_impl(client: &SdamClient, params: TestGetParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("test_id", &params.test_id)?;

    let ids = client.get_test_by_id(&params.subject, &params.test_id).await?;
    Ok(json_result(&ProblemIdsOutput::new(params.subject, ids)))
}

/// Input parameters for problem_search_image tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemSearchImageParams {
    /// Subject code.
    pub subject: String,
    /// Path to a picture of the problem text.
    pub image_path: String,
}

/// Implementation of the problem_search_image tool.
pub async fn problem_search_image_impl(
    client: &SdamClient, params: ProblemSearchImageParams,
) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("image_path", &params.image_path)?;

    let image = Path::new(&params.image_path);
    if !image.is_file() {
        return Err(Error::InvalidArgument(format!("image not found: {}", params.image_path)).into());
    }

    let ids = client.search_by_image(&params.subject, image).await?;
    Ok(json_result(&ProblemIdsOutput::new(params.subject, ids)))
}
