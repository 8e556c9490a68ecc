//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.
//! Every request waits on the shared [`Throttle`] first.

use std::sync::Arc;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichmentError, RecordingDetails};
use crate::enrichment::http::{self, RetryPolicy};
use crate::enrichment::throttle::Throttle;

const DEFAULT_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    throttle: Arc<Throttle>,
}

impl MusicBrainzClient {
    /// Create a new client. `http_client` must send a descriptive User-Agent.
    pub fn new(http_client: reqwest::Client, retry: RetryPolicy, throttle: Arc<Throttle>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry,
            throttle,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a recording by MusicBrainz ID
    pub async fn lookup_recording(
        &self,
        recording_id: &str,
    ) -> Result<RecordingDetails, EnrichmentError> {
        let response = self.send_recording_request(recording_id).await?;
        Ok(adapter::to_details(response))
    }

    fn recording_url(&self, recording_id: &str) -> String {
        format!(
            "{}/recording/{}?fmt=json&inc=artists+releases",
            self.base_url,
            urlencoding::encode(recording_id)
        )
    }

    async fn send_recording_request(
        &self,
        recording_id: &str,
    ) -> Result<dto::RecordingResponse, EnrichmentError> {
        let url = self.recording_url(recording_id);

        let response = http::with_retry(&self.retry, "musicbrainz recording", || async {
            self.throttle.acquire().await;
            http::send(&RetryPolicy::none(), "musicbrainz recording", || {
                self.http_client.get(&url)
            })
            .await
        })
        .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NoMatches);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::ApiError(error.error));
            }
            return Err(http::status_error(status));
        }

        response
            .json::<dto::RecordingResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
