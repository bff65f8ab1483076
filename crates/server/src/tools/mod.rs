//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-sdamgia server.

pub mod catalog;
pub mod listing;
pub mod problem;
pub mod test_gen;

pub use catalog::{CatalogGetParams, catalog_get_impl};
pub use listing::{
    CategoryGetParams, ProblemSearchImageParams, ProblemSearchParams, TestGetParams, category_get_impl,
    problem_search_image_impl, problem_search_impl, test_get_impl,
};
pub use problem::{ProblemGetParams, ProblemRandomParams, problem_get_impl, problem_random_impl};
pub use test_gen::{TestGenerateParams, TestPdfParams, test_generate_impl, test_pdf_impl};

use rmcp::model::{CallToolResult, Content};
use sdamgia_core::Error;
use serde::Serialize;

/// Wrap a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(output).unwrap_or_default())])
}

/// Reject blank string arguments.
pub(crate) fn require(name: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{name} cannot be empty")));
    }
    Ok(())
}

fn default_page() -> u32 {
    1
}

/// Reject page numbers below 1.
pub(crate) fn require_page(page: u32) -> Result<(), Error> {
    if page == 0 {
        return Err(Error::InvalidArgument("page must be at least 1".into()));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("subject", "math").is_ok());
        assert!(matches!(require("subject", "  "), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_require_page() {
        assert!(require_page(1).is_ok());
        assert!(require_page(0).is_err());
    }

    #[test]
    fn test_json_result_is_pretty_json() {
        let result = json_result(&serde_json::json!({"ids": ["1"]}));
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(testing::json(&result)["ids"][0], "1");
    }
}
