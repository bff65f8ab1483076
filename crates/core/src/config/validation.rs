//! Bounds checks applied to a loaded [`AppConfig`].

use std::ops::RangeInclusive;
use std::path::Path;

use crate::config::AppConfig;
use thiserror::Error;

const TIMEOUT_MS: RangeInclusive<u64> = 100..=300_000;
const MAX_RETRIES: u32 = 10;
const MAX_RETRY_BASE_DELAY_MS: u64 = 60_000;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.to_string(), reason: reason.into() }
}

fn non_empty_path(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() { Err(invalid(field, "must not be empty")) } else { Ok(()) }
}

impl AppConfig {
    /// Check value bounds.
    ///
    /// - `timeout_ms` within 100 ms..=5 min
    /// - `retries` at most 10
    /// - `retry_base_delay_ms` at most 60 s
    /// - `user_agent`, `tesseract_path`, `chrome_path` not empty
    ///
    /// HTML API credentials are only required by that renderer (see
    /// `HtmlApiRenderer::new` in the client); a half-configured pair is logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TIMEOUT_MS.contains(&self.timeout_ms) {
            return Err(invalid(
                "timeout_ms",
                format!("must be between {}ms and {}ms", TIMEOUT_MS.start(), TIMEOUT_MS.end()),
            ));
        }
        if self.retries > MAX_RETRIES {
            return Err(invalid("retries", format!("must not exceed {MAX_RETRIES}")));
        }
        if self.retry_base_delay_ms > MAX_RETRY_BASE_DELAY_MS {
            return Err(invalid(
                "retry_base_delay_ms",
                format!("must not exceed {MAX_RETRY_BASE_DELAY_MS}ms"),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        non_empty_path("tesseract_path", &self.tesseract_path)?;
        non_empty_path("chrome_path", &self.chrome_path)?;

        if self.html_api_key.is_some() != self.html_api_secret.is_some() {
            tracing::warn!(
                key_set = self.html_api_key.is_some(),
                secret_set = self.html_api_secret.is_some(),
                "html api renderer needs both key and secret"
            );
        }

        Ok(())
    }
}
