//! Resilient HTTP fetch pipeline.
//!
//! ### Retry
//! - Every GET goes through [`retry::with_retry`]: bounded attempts with
//!   linear backoff, HTTP-layer failures only.
//!
//! ### Redirect handling
//! - Page fetches follow redirects (max 10) and expect a 2xx.
//! - Endpoints that answer with a redirect (test generation, PDF export) use
//!   a second client that never follows redirects and accept a 3xx as the
//!   success signal. The `Location` is read with [`redirect`] helpers.

pub mod redirect;
pub mod retry;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use redirect::{location, resolve_location, test_id_from_location};
pub use retry::{RetryPolicy, check_status, is_redirect, with_retry};

use sdamgia_core::{AppConfig, Error};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Transport settings for [`FetchClient`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    /// Redirect hops allowed for page fetches.
    pub max_redirects: usize,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: 10,
            retry: RetryPolicy { retries: config.retries, base_delay: config.retry_base_delay() },
        }
    }
}

/// A response read to completion.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL; the request URL for redirect endpoints.
    pub url: Url,
    pub status: StatusCode,
    pub headers: header::HeaderMap,
    pub bytes: Bytes,
    pub fetch_ms: u64,
}

pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() { Error::Timeout(err.to_string()) } else { Error::Network(err.to_string()) }
}

/// Pair of reqwest clients, one following redirects and one not, sharing a
/// retry policy.
#[derive(Debug, Clone)]
pub struct FetchClient {
    follow: Client,
    no_follow: Client,
    config: FetchConfig,
}

impl FetchClient {
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let build = |policy: reqwest::redirect::Policy| {
            Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(config.timeout)
                .use_rustls_tls()
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .redirect(policy)
                .build()
                .map_err(|e| Error::Internal(format!("cannot build HTTP client: {e}")))
        };

        let follow = build(reqwest::redirect::Policy::limited(config.max_redirects))?;
        let no_follow = build(reqwest::redirect::Policy::none())?;
        Ok(Self { follow, no_follow, config })
    }

    /// GET a page; anything but 2xx after retries is an error.
    pub async fn get(&self, url: &Url, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
        let http = &self.follow;
        with_retry(&self.config.retry, false, move || send(http, url, query)).await
    }

    /// GET an endpoint that answers with a redirect. The 3xx itself is the
    /// successful response; read its target with [`location`].
    pub async fn get_redirect(&self, url: &Url, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
        let http = &self.no_follow;
        with_retry(&self.config.retry, true, move || send(http, url, query)).await
    }

    /// Redirect-following client, shared with the HTML-to-image renderer.
    pub fn http(&self) -> &Client {
        &self.follow
    }
}

async fn send(http: &Client, url: &Url, query: &[(&str, String)]) -> Result<FetchResponse, Error> {
    let started = Instant::now();
    let response = http
        .get(url.clone())
        .query(query)
        .header(header::ACCEPT, ACCEPT_HTML)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let url = response.url().clone();
    let headers = response.headers().clone();
    let bytes = response.bytes().await.map_err(transport_error)?;
    let fetch_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::debug!(%url, status = status.as_u16(), fetch_ms, len = bytes.len(), "fetched");
    Ok(FetchResponse { url, status, headers, bytes, fetch_ms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn fast_config(retries: u32) -> FetchConfig {
        FetchConfig { retry: RetryPolicy { retries, base_delay: Duration::ZERO }, ..Default::default() }
    }

    #[test]
    fn test_fetch_config_follows_app_config() {
        let defaults = FetchConfig::default();
        assert_eq!(defaults.user_agent, "sdamgia-api/async");
        assert_eq!(defaults.timeout, Duration::from_secs(20));
        assert_eq!(defaults.max_redirects, 10);

        let app = AppConfig { retries: 4, retry_base_delay_ms: 250, timeout_ms: 5_000, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.retry.retries, 4);
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_get_sends_query_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("search", "две окружности"))
            .and(query_param("page", "2"))
            .and(wiremock::matchers::header("user-agent", "sdamgia-api/async"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(fast_config(0)).unwrap();
        let url = Url::parse(&format!("{}/search", server.uri())).unwrap();
        let response = client
            .get(&url, &[("search", "две окружности".to_string()), ("page", "2".to_string())])
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.bytes[..], b"<html>ok</html>");
    }

    #[tokio::test]
    async fn test_get_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prob_catalog"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/prob_catalog"))
            .respond_with(ResponseTemplate::new(200).set_body_string("catalog"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(fast_config(2)).unwrap();
        let url = Url::parse(&format!("{}/prob_catalog", server.uri())).unwrap();
        let response = client.get(&url, &[]).await.unwrap();

        assert_eq!(&response.bytes[..], b"catalog");
    }

    #[tokio::test]
    async fn test_get_gives_up_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&server)
            .await;

        let client = FetchClient::new(fast_config(2)).unwrap();
        let url = Url::parse(&format!("{}/problem", server.uri())).unwrap();
        let result = client.get(&url, &[("id", "1".to_string())]).await;

        assert!(matches!(result, Err(Error::HttpStatus { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_get_redirect_is_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test"))
            .and(query_param("a", "generate"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/test?id=70412345"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(fast_config(2)).unwrap();
        let url = Url::parse(&format!("{}/test", server.uri())).unwrap();
        let response = client.get_redirect(&url, &[("a", "generate".to_string())]).await.unwrap();

        assert_eq!(response.status, StatusCode::FOUND);
        assert_eq!(location(&response).unwrap(), "/test?id=70412345");
    }
}
