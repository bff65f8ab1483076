//! Runtime settings for the sdamgia client and server.
//!
//! Values come from three figment layers; later layers override earlier ones:
//! built-in defaults, an optional TOML file named by `SDAMGIA_CONFIG_FILE`,
//! then `SDAMGIA_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

const ENV_PREFIX: &str = "SDAMGIA_";
const CONFIG_FILE_VAR: &str = "SDAMGIA_CONFIG_FILE";

/// Settings shared by fetching, OCR and rendering.
///
/// Every field maps to `SDAMGIA_<FIELD>` in the environment, e.g.
/// `SDAMGIA_TIMEOUT_MS=5000`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-request timeout (ms).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra attempts after a failed request.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Backoff unit: attempt `n` waits `n * retry_base_delay_ms`.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// tesseract binary, resolved through PATH when relative.
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: PathBuf,

    /// Browser for the local screenshot renderer. The bare name `chrome`
    /// tries the common Chrome/Chromium names on PATH.
    #[serde(default = "default_chrome_path")]
    pub chrome_path: PathBuf,

    /// HTML-to-image service key.
    #[serde(default)]
    pub html_api_key: Option<String>,

    /// HTML-to-image service secret.
    #[serde(default)]
    pub html_api_secret: Option<String>,

    /// Where renderers put their scratch HTML; the system temp dir if unset.
    #[serde(default)]
    pub tmp_html_dir: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn default_user_agent() -> String {
    "sdamgia-api/async".into()
}

fn default_tesseract_path() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_chrome_path() -> PathBuf {
    PathBuf::from("chrome")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            user_agent: default_user_agent(),
            tesseract_path: default_tesseract_path(),
            chrome_path: default_chrome_path(),
            html_api_key: None,
            html_api_secret: None,
            tmp_html_dir: None,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Scratch directory for render HTML.
    pub fn tmp_html_dir(&self) -> PathBuf {
        self.tmp_html_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Merge defaults, the optional TOML file and the environment, then
    /// [`validate`](Self::validate) the result.
    ///
    /// Nested keys use `__` in variable names.
    pub fn load() -> Result<Self, ConfigError> {
        let mut layers = Figment::from(Serialized::defaults(Self::default()));
        if let Ok(file) = std::env::var(CONFIG_FILE_VAR) {
            layers = layers.merge(Toml::file(file));
        }
        let config: Self = layers
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()).split("__"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.retries, 2);
        assert_eq!(config.retry_base_delay_ms, 1_000);
        assert_eq!(config.user_agent, "sdamgia-api/async");
        assert_eq!(config.tesseract_path, PathBuf::from("tesseract"));
        assert_eq!(config.chrome_path, PathBuf::from("chrome"));
        assert!(config.html_api_key.is_none());
        assert!(config.html_api_secret.is_none());
        assert!(config.tmp_html_dir.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.retry_base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("sdamgia.toml", "retries = 5\nuser_agent = \"from-file\"\n")?;
            jail.set_env("SDAMGIA_CONFIG_FILE", "sdamgia.toml");
            jail.set_env("SDAMGIA_USER_AGENT", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.retries, 5);
            assert_eq!(config.user_agent, "from-env");
            assert_eq!(config.timeout_ms, 20_000);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("SDAMGIA_TIMEOUT_MS", "10");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
