//! Remote HTML-to-image conversion.

use std::path::Path;
use std::time::Instant;

use super::{ProblemRenderer, RenderError, RenderSettings};

/// Default conversion endpoint.
pub const DEFAULT_HTML_API_ENDPOINT: &str = "https://api.grabz.it/services/convert";

const BROWSER_WIDTH: &str = "800";
// full page height
const BROWSER_HEIGHT: &str = "-1";

/// Posts problem HTML to a conversion service and stores the returned image.
///
/// The request is a form with `key`, `secret`, `html`, `width`, `height` and
/// `format` fields; the response body is the image itself.
#[derive(Debug, Clone)]
pub struct HtmlApiRenderer {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    secret: String,
}

impl HtmlApiRenderer {
    pub fn new(http: reqwest::Client, settings: &RenderSettings) -> Result<Self, RenderError> {
        let (Some(key), Some(secret)) = (&settings.html_api_key, &settings.html_api_secret) else {
            return Err(RenderError::Credentials(
                "set SDAMGIA_HTML_API_KEY and SDAMGIA_HTML_API_SECRET for the html_api backend".into(),
            ));
        };

        Ok(Self { http, endpoint: settings.html_api_endpoint.clone(), key: key.clone(), secret: secret.clone() })
    }
}

#[async_trait::async_trait]
impl ProblemRenderer for HtmlApiRenderer {
    async fn render(&self, problem_id: &str, html: &str, target: &Path) -> Result<(), RenderError> {
        let start = Instant::now();
        let form = [
            ("key", self.key.as_str()),
            ("secret", self.secret.as_str()),
            ("html", html),
            ("width", BROWSER_WIDTH),
            ("height", BROWSER_HEIGHT),
            ("format", "png"),
        ];

        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Service { status: status.as_u16(), message: message.trim().to_string() });
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| RenderError::Screenshot(e.to_string()))?;
        tokio::fs::write(target, &image).await?;

        tracing::debug!(
            problem_id,
            bytes = image.len(),
            ms = start.elapsed().as_millis() as u64,
            "rendered problem via html api"
        );
        Ok(())
    }
}
