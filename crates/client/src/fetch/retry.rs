//! Bounded retry with linear backoff.
//!
//! One logical GET is retried up to `retries` extra times. Attempt `n`
//! (1-based) is preceded by a sleep of `base_delay × n`. Only HTTP-layer
//! failures are retried; anything else surfaces immediately.

use std::future::Future;
use std::time::Duration;

use sdamgia_core::Error;

use super::FetchResponse;

/// Retry policy for the resilient fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first request (default: 2).
    pub retries: u32,
    /// Linear backoff base (default: 1s).
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: 2, base_delay: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    /// Sleep before the given retry attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Whether `response` is a redirect the caller can follow: 301, 302, 303,
/// 307 or 308 with a `Location` header.
pub fn is_redirect(response: &FetchResponse) -> bool {
    matches!(response.status.as_u16(), 301 | 302 | 303 | 307 | 308)
        && response.headers.contains_key(reqwest::header::LOCATION)
}

/// Check a response against the expected success signal.
///
/// With `allow_redirect_response`, a redirect (see [`is_redirect`]) is
/// accepted as-is. Every other non-2xx status is `Error::HttpStatus`, so a
/// bare 3xx is retried like any HTTP failure.
pub fn check_status(response: FetchResponse, allow_redirect_response: bool) -> Result<FetchResponse, Error> {
    if allow_redirect_response && is_redirect(&response) {
        return Ok(response);
    }

    if !response.status.is_success() {
        return Err(Error::HttpStatus { status: response.status.as_u16(), url: response.url.to_string() });
    }

    Ok(response)
}

/// Run `request` until it yields an acceptable response or the policy is
/// exhausted.
///
/// The last HTTP-layer error is returned unchanged once all attempts fail.
pub async fn with_retry<F, Fut>(
    policy: &RetryPolicy, allow_redirect_response: bool, mut request: F,
) -> Result<FetchResponse, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<FetchResponse, Error>>,
{
    let mut attempt = 0u32;

    loop {
        let error = match request().await {
            Ok(response) => match check_status(response, allow_redirect_response) {
                Ok(response) => return Ok(response),
                Err(e) => e,
            },
            Err(e) => e,
        };

        if !error.is_http() || attempt >= policy.retries {
            return Err(error);
        }

        attempt += 1;
        let delay = policy.delay_for(attempt);
        tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "request failed: {error}; retrying");
        tokio::time::sleep(delay).await;
    }
}
