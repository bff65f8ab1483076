//! test_generate and test_pdf tool implementations.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use sdamgia_client::{PdfFlag, PdfOptions, SdamClient, TestPlan};
use sdamgia_core::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{json_result, require};

/// Input parameters for test_generate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TestGenerateParams {
    /// Subject code.
    pub subject: String,

    /// Problems per catalog topic. Used when `problems` is not given
    /// (default: 1).
    #[serde(default)]
    pub count_per_topic: Option<u32>,

    /// Problem count per topic number, e.g. {"1": 2, "5": 1}.
    #[serde(default)]
    pub problems: Option<BTreeMap<u32, u32>>,
}

impl TestGenerateParams {
    fn plan(&self) -> Result<TestPlan, Error> {
        match (&self.problems, self.count_per_topic) {
            (Some(_), Some(_)) => {
                Err(Error::InvalidArgument("give either count_per_topic or problems, not both".into()))
            }
            (Some(problems), None) if problems.is_empty() => {
                Err(Error::InvalidArgument("problems cannot be empty".into()))
            }
            (Some(problems), None) => Ok(TestPlan::PerTopic(problems.clone())),
            (None, Some(count)) => Ok(TestPlan::Full(count)),
            (None, None) => Ok(TestPlan::default()),
        }
    }
}

/// Output structure for test_generate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TestGenerateOutput {
    pub subject: String,
    /// Id of the generated test.
    pub test_id: String,
}

/// Implementation of the test_generate tool.
pub async fn test_generate_impl(client: &SdamClient, params: TestGenerateParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    let plan = params.plan()?;

    let test_id = client.generate_test(&params.subject, &plan).await?;
    Ok(json_result(&TestGenerateOutput { subject: params.subject, test_id }))
}

/// A printable-test option: `true`/`false` or a literal value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

fn flag(value: &Option<FlagValue>) -> PdfFlag {
    match value {
        None => PdfFlag::Absent,
        Some(FlagValue::Bool(b)) => PdfFlag::from(*b),
        Some(FlagValue::Text(s)) => PdfFlag::from(s.as_str()),
    }
}

/// Input parameters for test_pdf tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TestPdfParams {
    /// Subject code.
    pub subject: String,
    /// Test id.
    pub test_id: String,
    /// Include solutions.
    #[serde(default)]
    pub solution: Option<FlagValue>,
    /// Show problem numbers.
    #[serde(default)]
    pub nums: Option<FlagValue>,
    /// Include the answers section.
    #[serde(default)]
    pub answers: Option<FlagValue>,
    /// Include the answer key.
    #[serde(default)]
    pub key: Option<FlagValue>,
    /// Include grading criteria.
    #[serde(default)]
    pub crit: Option<FlagValue>,
    /// Include the instruction text.
    #[serde(default)]
    pub instruction: Option<FlagValue>,
    /// Footer text.
    #[serde(default)]
    pub col: Option<FlagValue>,
    /// Layout mode (default: true).
    #[serde(default)]
    pub pdf: Option<FlagValue>,
}

impl TestPdfParams {
    fn options(&self) -> PdfOptions {
        PdfOptions {
            solution: flag(&self.solution),
            nums: flag(&self.nums),
            answers: flag(&self.answers),
            key: flag(&self.key),
            crit: flag(&self.crit),
            instruction: flag(&self.instruction),
            col: flag(&self.col),
            pdf: match &self.pdf {
                None => PdfFlag::enabled(),
                some => flag(some),
            },
        }
    }
}

/// Output structure for test_pdf tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TestPdfOutput {
    pub subject: String,
    pub test_id: String,
    /// Absolute URL of the PDF.
    pub pdf_url: String,
}

/// Implementation of the test_pdf tool.
pub async fn test_pdf_impl(client: &SdamClient, params: TestPdfParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;
    require("test_id", &params.test_id)?;

    let pdf_url = client
        .generate_pdf(&params.subject, &params.test_id, &params.options())
        .await?;
    Ok(json_result(&TestPdfOutput { subject: params.subject, test_id: params.test_id, pdf_url }))
}
