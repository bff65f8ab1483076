//! problem_get and problem_random tool implementations.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use sdamgia_client::{RenderBackend, RenderRequest, SdamClient};
use sdamgia_core::{Error, Problem};
use serde::{Deserialize, Serialize};

use super::{json_result, require};

/// Input parameters for problem_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemGetParams {
    /// Subject code, e.g. "math", "phys", "rus".
    pub subject: String,

    /// Problem id.
    pub id: String,

    /// Also render the problem to an image file.
    #[serde(default)]
    pub render: Option<RenderParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderParams {
    /// Backend: "headless", "html_api" or "local_browser".
    pub backend: String,
    /// Output image path.
    pub path: String,
}

/// Output structure for problem_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemGetOutput {
    pub subject: String,
    /// The problem, or null when the page has no problem.
    pub problem: Option<Problem>,
    /// Path of the rendered image, if rendering was requested.
    pub image_path: Option<String>,
}

/// Implementation of the problem_get tool.
pub async fn problem_get_impl(client: &SdamClient, params: ProblemGetParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("id", &params.id)?;

    let render = match &params.render {
        Some(render) => {
            require("render.path", &render.path)?;
            Some(RenderRequest::new(render.backend.parse::<RenderBackend>()?, &render.path))
        }
        None => None,
    };

    let problem = client
        .get_problem_by_id(&params.subject, &params.id, render.as_ref())
        .await?;

    let image_path = match (&problem, params.render) {
        (Some(_), Some(render)) => Some(render.path),
        _ => None,
    };

    Ok(json_result(&ProblemGetOutput { subject: params.subject, problem, image_path }))
}

/// Input parameters for problem_random tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemRandomParams {
    /// Subject code.
    pub subject: String,

    /// Topic number from the catalog, e.g. "1".
    pub topic_id: String,

    /// Prefer problems added within this many days (default: 30).
    #[serde(default = "default_period_days")]
    pub period_days: i64,

    /// Seed for a reproducible pick.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_period_days() -> i64 {
    30
}

/// Output structure for problem_random tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemRandomOutput {
    pub subject: String,
    pub topic_id: String,
    /// The selected problem, or null when the topic has none.
    pub problem: Option<Problem>,
}

/// Implementation of the problem_random tool.
pub async fn problem_random_impl(client: &SdamClient, params: ProblemRandomParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("topic_id", &params.topic_id)?;
    if params.period_days < 1 {
        return Err(Error::InvalidArgument(format!("period_days must be at least 1, got {}", params.period_days)).into());
    }

    let problem = client
        .get_random_problem(&params.subject, &params.topic_id, params.period_days, params.seed)
        .await?;

    Ok(json_result(&ProblemRandomOutput { subject: params.subject, topic_id: params.topic_id, problem }))
}
