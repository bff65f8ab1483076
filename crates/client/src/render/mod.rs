//! Problem rendering to image files.
//!
//! A problem page's block is trimmed to the problem itself (see
//! [`crate::extract::parse_problem_page`]) and handed to one of three
//! backends as standalone HTML:
//!
//! - [`RenderBackend::Headless`]: chromiumoxide-driven Chrome, full-page
//!   screenshot (requires the `render` feature)
//! - [`RenderBackend::HtmlApi`]: remote HTML-to-image conversion service
//! - [`RenderBackend::LocalBrowser`]: a local Chrome binary run with
//!   `--headless --screenshot`

use sdamgia_core::{AppConfig, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "render")]
pub mod headless;
pub mod html_api;
pub mod local_browser;

#[cfg(feature = "render")]
pub use headless::HeadlessRenderer;
pub use html_api::{DEFAULT_HTML_API_ENDPOINT, HtmlApiRenderer};
pub use local_browser::LocalBrowserRenderer;

/// Errors that can occur while rendering a problem.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to a browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to load the problem HTML.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to capture or store the image.
    #[error("screenshot failed: {0}")]
    Screenshot(String),

    /// Backend did not finish in time.
    #[error("render timeout after {0}ms")]
    Timeout(u64),

    /// Backend needs credentials that are not configured.
    #[error("missing credentials: {0}")]
    Credentials(String),

    /// Conversion service answered with an error status.
    #[error("render service returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// Temporary file handling failed.
    #[error("io error: {0}")]
    Io(String),

    /// Backend not compiled into this build.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

/// Rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    #[serde(alias = "pyppeteer")]
    Headless,
    #[serde(alias = "grabzit")]
    HtmlApi,
    #[serde(alias = "html2img")]
    LocalBrowser,
}

impl RenderBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderBackend::Headless => "headless",
            RenderBackend::HtmlApi => "html_api",
            RenderBackend::LocalBrowser => "local_browser",
        }
    }
}

impl fmt::Display for RenderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderBackend {
    type Err = Error;

    /// Accepts the canonical names plus the legacy `pyppeteer`, `grabzit`
    /// and `html2img` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" | "pyppeteer" => Ok(RenderBackend::Headless),
            "html_api" | "grabzit" => Ok(RenderBackend::HtmlApi),
            "local_browser" | "html2img" => Ok(RenderBackend::LocalBrowser),
            other => Err(Error::InvalidArgument(format!(
                "unknown render backend {other:?}; expected headless, html_api or local_browser"
            ))),
        }
    }
}

/// Where and how to render a fetched problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub backend: RenderBackend,
    /// Output image path.
    pub path: PathBuf,
}

impl RenderRequest {
    pub fn new(backend: RenderBackend, path: impl Into<PathBuf>) -> Self {
        Self { backend, path: path.into() }
    }
}

/// Renders problem HTML into an image file.
#[async_trait::async_trait]
pub trait ProblemRenderer: Send + Sync {
    /// Render `html` of problem `problem_id` into `target`.
    async fn render(&self, problem_id: &str, html: &str, target: &Path) -> Result<(), RenderError>;
}

/// Settings shared by the render backends.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Local browser binary. `chrome` means "look up a browser on PATH".
    pub chrome_path: PathBuf,
    pub html_api_key: Option<String>,
    pub html_api_secret: Option<String>,
    pub html_api_endpoint: String,
    /// Directory for the temporary HTML files.
    pub tmp_html_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RenderSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            html_api_key: config.html_api_key.clone(),
            html_api_secret: config.html_api_secret.clone(),
            html_api_endpoint: DEFAULT_HTML_API_ENDPOINT.to_string(),
            tmp_html_dir: config.tmp_html_dir(),
            // browsers need longer than a page fetch
            timeout: config.timeout().saturating_mul(3),
        }
    }
}

/// Build the renderer for `backend`.
///
/// `http` is reused by backends that talk to a remote service.
pub fn renderer_for(
    backend: RenderBackend, settings: &RenderSettings, http: &reqwest::Client,
) -> Result<Box<dyn ProblemRenderer>, RenderError> {
    match backend {
        #[cfg(feature = "render")]
        RenderBackend::Headless => Ok(Box::new(HeadlessRenderer::new(settings.clone()))),
        #[cfg(not(feature = "render"))]
        RenderBackend::Headless => {
            Err(RenderError::Unavailable("headless rendering requires the `render` feature".into()))
        }
        RenderBackend::HtmlApi => Ok(Box::new(HtmlApiRenderer::new(http.clone(), settings)?)),
        RenderBackend::LocalBrowser => Ok(Box::new(LocalBrowserRenderer::new(settings.clone()))),
    }
}

/// Write `html` to a fresh, uniquely named file in the temp HTML directory.
///
/// Only the ASCII alphanumerics of `problem_id` go into the file name.
pub(crate) async fn write_tmp_html(settings: &RenderSettings, problem_id: &str, html: &str) -> Result<PathBuf, RenderError> {
    tokio::fs::create_dir_all(&settings.tmp_html_dir).await?;
    let dir = std::path::absolute(&settings.tmp_html_dir)?;

    let tag: String = problem_id.chars().filter(char::is_ascii_alphanumeric).take(32).collect();
    let path = tempfile::Builder::new()
        .prefix(&format!("problem-{tag}-"))
        .suffix(".html")
        .tempfile_in(&dir)?
        .into_temp_path()
        .keep()
        .map_err(|e| RenderError::Io(e.to_string()))?;

    tokio::fs::write(&path, html).await?;
    Ok(path)
}

/// Remove a temporary HTML file, logging instead of failing.
pub(crate) async fn remove_tmp_html(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), error = %e, "failed to remove temporary html");
    }
}
