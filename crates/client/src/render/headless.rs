//! Headless Chrome rendering via chromiumoxide.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use futures_util::StreamExt;
use std::path::Path;
use std::time::Instant;
use url::Url;

use super::{ProblemRenderer, RenderError, RenderSettings, remove_tmp_html, write_tmp_html};

/// Launches a headless browser per render, opens the problem from a
/// temporary file and takes a full-page screenshot.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    settings: RenderSettings,
}

impl HeadlessRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    async fn screenshot(&self, page_url: &Url, target: &Path) -> Result<(), RenderError> {
        let (mut browser, mut handler) =
            Browser::launch(BrowserConfig::builder().build().map_err(RenderError::BrowserLaunch)?)
                .await
                .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        let result: Result<(), RenderError> = async {
            let page = browser
                .new_page(page_url.as_str())
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            page.save_screenshot(ScreenshotParams::builder().full_page(true).build(), target)
                .await
                .map_err(|e| RenderError::Screenshot(e.to_string()))?;
            Ok(())
        }
        .await;

        browser.close().await.ok();
        browser.wait().await.ok();
        events.abort();
        result
    }
}

#[async_trait::async_trait]
impl ProblemRenderer for HeadlessRenderer {
    async fn render(&self, problem_id: &str, html: &str, target: &Path) -> Result<(), RenderError> {
        let start = Instant::now();
        let tmp = write_tmp_html(&self.settings, problem_id, html).await?;

        let result = match Url::from_file_path(&tmp) {
            Ok(page_url) => {
                let timeout_ms = self.settings.timeout.as_millis() as u64;
                tokio::time::timeout(self.settings.timeout, self.screenshot(&page_url, target))
                    .await
                    .unwrap_or_else(|_| Err(RenderError::Timeout(timeout_ms)))
            }
            Err(()) => Err(RenderError::Navigation(format!("not a file path: {}", tmp.display()))),
        };
        remove_tmp_html(&tmp).await;
        result?;

        tracing::debug!(problem_id, ms = start.elapsed().as_millis() as u64, "rendered problem via headless browser");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_headless_render() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = HeadlessRenderer::new(RenderSettings {
            tmp_html_dir: dir.path().join("html"),
            ..RenderSettings::default()
        });
        let target = dir.path().join("1001.png");

        renderer.render("1001", "<div class=\"prob_maindiv\">2 + 2</div>", &target).await.unwrap();
        assert!(std::fs::metadata(&target).unwrap().len() > 0);
        assert!(std::fs::read_dir(dir.path().join("html")).unwrap().next().is_none());
    }
}
