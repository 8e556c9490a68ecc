//! AcoustID HTTP client
//!
//! Handles communication with the AcoustID web service.
//! See: https://acoustid.org/webservice
//!
//! ## API Quirks
//!
//! ### URL Encoding Issue with Meta Parameter
//! The AcoustID API uses `+` as a separator in the `meta` parameter (e.g., `recordings+releasegroups`).
//! Standard URL encoding converts `+` to `%2B`, but the API does NOT recognize `%2B` as a separator.
//! When `%2B` is sent, the API returns results WITHOUT the requested metadata fields.
//!
//! **Solution**: Build the URL manually, preserving the literal `+` character.
//! Do NOT use reqwest's `.query()` method for the meta parameter.
//!
//! ### Request Method
//! GET works reliably with metadata and fingerprints (~3400 chars) fit in URLs.
//! POST doesn't return metadata even with a correct body encoding.

use super::{adapter, dto};
use crate::enrichment::domain::{AudioFingerprint, EnrichmentError, RecordingMatch};
use crate::enrichment::http::{self, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.acoustid.org/v2/lookup";

/// AcoustID API client
pub struct AcoustIdClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl AcoustIdClient {
    /// Create a new client sharing the given HTTP client
    pub fn new(
        api_key: impl Into<String>,
        http_client: reqwest::Client,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry,
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a fingerprint and return recording matches
    pub async fn lookup(
        &self,
        fingerprint: &AudioFingerprint,
    ) -> Result<Vec<RecordingMatch>, EnrichmentError> {
        let response = self.send_lookup_request(fingerprint).await?;
        adapter::to_matches(response)
    }

    /// Build the lookup URL.
    ///
    /// The `+` separators in `meta` must stay literal or the API drops the
    /// recordings from its answer.
    fn lookup_url(&self, fingerprint: &AudioFingerprint) -> String {
        format!(
            "{}?client={}&duration={}&fingerprint={}&meta=recordings+releasegroups+compress",
            self.base_url,
            urlencoding::encode(&self.api_key),
            fingerprint.duration_secs,
            urlencoding::encode(&fingerprint.fingerprint)
        )
    }

    async fn send_lookup_request(
        &self,
        fingerprint: &AudioFingerprint,
    ) -> Result<dto::LookupResponse, EnrichmentError> {
        let url = self.lookup_url(fingerprint);
        let response = http::send(&self.retry, "acoustid lookup", || {
            self.http_client.get(&url)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            // AcoustID reports bad keys and malformed fingerprints as 400 with a JSON body
            return match response.json::<dto::LookupResponse>().await {
                Ok(dto::LookupResponse {
                    error: Some(error), ..
                }) => Err(EnrichmentError::ApiError(error.message)),
                _ => Err(http::status_error(status)),
            };
        }

        response
            .json::<dto::LookupResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
