//! Shared HTTP plumbing for the provider clients.
//!
//! Every outbound request goes through a client built here (gzip, user agent,
//! bounded timeout) and through [`send`], which retries transient failures
//! with exponential backoff.

use std::future::Future;
use std::time::Duration;

use crate::enrichment::domain::EnrichmentError;

/// Default User-Agent. MusicBrainz rejects anonymous clients.
pub const USER_AGENT: &str = concat!(
    "MusicRetagger/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/music-retagger)"
);

/// Bounded retry settings for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }
}

/// Build an HTTP client with gzip, a User-Agent and a per-request timeout.
pub fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .expect("Failed to build HTTP client")
}

/// Run `op` until it succeeds, fails with a terminal error, or the retry
/// budget is spent. Only [`EnrichmentError::is_transient`] errors are retried.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, EnrichmentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EnrichmentError>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => {
                if retry > 0 {
                    tracing::debug!(what, retry, "request recovered after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && retry < policy.max_retries => {
                retry += 1;
                let backoff = policy.backoff_for(retry);
                tracing::warn!(
                    what,
                    retry,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "request failed; retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Send a request with retries and classify the response status.
///
/// `make_request` is called once per attempt because request bodies such as
/// multipart forms can't be replayed. 429 and 5xx responses become transient
/// errors; every other status is handed back for the caller to interpret.
pub async fn send<F>(
    policy: &RetryPolicy,
    what: &str,
    make_request: F,
) -> Result<reqwest::Response, EnrichmentError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    with_retry(policy, what, || async {
        let response = make_request()
            .send()
            .await
            .map_err(EnrichmentError::from_transport)?;
        classify_status(response)
    })
    .await
}

fn classify_status(response: reqwest::Response) -> Result<reqwest::Response, EnrichmentError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(EnrichmentError::RateLimited);
    }
    if status.is_server_error() {
        return Err(status_error(status));
    }
    Ok(response)
}

/// Terminal error for a non-success status.
pub fn status_error(status: reqwest::StatusCode) -> EnrichmentError {
    EnrichmentError::HttpStatus {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
