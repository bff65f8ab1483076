//! Screenshots through a locally installed Chrome binary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use url::Url;

use super::{ProblemRenderer, RenderError, RenderSettings, remove_tmp_html, write_tmp_html};

/// Configured path meaning "find a browser on PATH".
const DEFAULT_CHROME: &str = "chrome";
const BROWSER_CANDIDATES: &[&str] = &["chrome", "google-chrome", "chromium", "chromium-browser"];
const WINDOW_SIZE: &str = "1920,1080";

/// Runs `chrome --headless --screenshot` on a temporary HTML file.
#[derive(Debug, Clone)]
pub struct LocalBrowserRenderer {
    settings: RenderSettings,
}

impl LocalBrowserRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    fn custom_browser(&self) -> bool {
        self.settings.chrome_path.as_path() != Path::new(DEFAULT_CHROME)
    }

    /// Browser binaries to try, in order.
    fn binaries(&self) -> Vec<PathBuf> {
        if self.custom_browser() {
            vec![self.settings.chrome_path.clone()]
        } else {
            BROWSER_CANDIDATES.iter().map(PathBuf::from).collect()
        }
    }

    /// Arguments for a screenshot of `page` into `target`.
    fn args(&self, page: &Url, target: &Path) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--hide-scrollbars".to_string(),
            format!("--window-size={WINDOW_SIZE}"),
            format!("--screenshot={}", target.display()),
        ];
        if self.custom_browser() {
            args.push("--no-sandbox".to_string());
        }
        args.push(page.to_string());
        args
    }

    async fn run(&self, page: &Url, target: &Path) -> Result<(), RenderError> {
        let args = self.args(page, target);

        for binary in self.binaries() {
            let child = Command::new(&binary).args(&args).kill_on_drop(true).output();
            let output = match tokio::time::timeout(self.settings.timeout, child).await {
                Err(_) => return Err(RenderError::Timeout(self.settings.timeout.as_millis() as u64)),
                Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(binary = %binary.display(), "browser binary not found");
                    continue;
                }
                Ok(Err(e)) => return Err(RenderError::BrowserLaunch(format!("{}: {e}", binary.display()))),
                Ok(Ok(output)) => output,
            };

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(RenderError::Screenshot(format!(
                    "{} exited with {}: {}",
                    binary.display(),
                    output.status,
                    stderr.trim()
                )));
            }
            return Ok(());
        }

        Err(RenderError::BrowserLaunch(format!(
            "no browser found (tried {})",
            self.binaries().iter().map(|b| b.display().to_string()).collect::<Vec<_>>().join(", ")
        )))
    }
}

#[async_trait::async_trait]
impl ProblemRenderer for LocalBrowserRenderer {
    async fn render(&self, problem_id: &str, html: &str, target: &Path) -> Result<(), RenderError> {
        let start = Instant::now();
        let tmp = write_tmp_html(&self.settings, problem_id, html).await?;

        let result = match Url::from_file_path(&tmp) {
            Ok(page) => match std::path::absolute(target) {
                Ok(target) => self.run(&page, &target).await,
                Err(e) => Err(e.into()),
            },
            Err(()) => Err(RenderError::Navigation(format!("not a file path: {}", tmp.display()))),
        };
        remove_tmp_html(&tmp).await;
        result?;

        tracing::debug!(problem_id, ms = start.elapsed().as_millis() as u64, "rendered problem via local browser");
        Ok(())
    }
}
