//! catalog_get tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use sdamgia_client::SdamClient;
use sdamgia_core::Catalog;
use serde::{Deserialize, Serialize};

use super::{json_result, require};

/// Input parameters for catalog_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogGetParams {
    /// Subject code.
    pub subject: String,
}

/// Output structure for catalog_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogGetOutput {
    pub subject: String,
    /// Topics with their categories.
    pub topics: Catalog,
}

/// Implementation of the catalog_get tool.
pub async fn catalog_get_impl(client: &SdamClient, params: CatalogGetParams) -> Result<CallToolResult, McpError> {
    require("subject", &params.subject)?;

    let topics = client.get_catalog(&params.subject).await?;
    Ok(json_result(&CatalogGetOutput { subject: params.subject, topics }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{client, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_catalog_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prob_catalog"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"
                <div class="cat_category"><b class="cat_name">Все</b></div>
                <div class="cat_category">
                    <b class="cat_name">1. Простейшие уравнения</b>
                    <div class="cat_children">
                        <div class="cat_category" data-id="17"><a class="cat_name">Линейные</a></div>
                    </div>
                </div>
                "#,
            ))
            .mount(&server)
            .await;

        let params = CatalogGetParams { subject: "math".into() };
        let result = catalog_get_impl(&client(&server.uri()), params).await.unwrap();
        let output = json(&result);
        assert_eq!(output["topics"][0]["topic_id"], "1");
        assert_eq!(output["topics"][0]["topic_name"], "Простейшие уравнения");
        assert_eq!(output["topics"][0]["categories"][0]["category_id"], "17");
    }

    #[tokio::test]
    async fn test_catalog_get_structure_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="cat_category"><b class="cat_name">Все</b></div><div class="cat_category"></div>"#,
            ))
            .mount(&server)
            .await;

        let result = catalog_get_impl(&client(&server.uri()), CatalogGetParams { subject: "math".into() }).await;
        assert_eq!(result.unwrap_err().code, ErrorCode(-32000));
    }

    #[tokio::test]
    async fn test_catalog_get_empty_subject() {
        let result = catalog_get_impl(&client("http://127.0.0.1:9"), CatalogGetParams { subject: "".into() }).await;
        assert_eq!(result.unwrap_err().code, ErrorCode(-32602));
    }
}
