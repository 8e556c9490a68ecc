//! Cover Art Archive HTTP client
//!
//! Looks up artwork listings from the Cover Art Archive and downloads image
//! payloads from any artwork host.
//! No API key required, but please respect their rate limits.
//!
//! API: https://coverartarchive.org

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::dto;
use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::http::{self, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://coverartarchive.org";

/// Desired cover art size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSize {
    /// 250px thumbnail
    Small,
    /// 500px thumbnail (default)
    #[default]
    Medium,
    /// 1200px thumbnail
    Large,
    /// Original full-size image
    Original,
}

impl CoverSize {
    /// URL of this size for `image`, falling back to the full-size image
    /// when the thumbnail doesn't exist.
    fn pick(self, image: &dto::Image) -> String {
        let thumbnail = match self {
            CoverSize::Small => image.thumbnails.small.as_ref(),
            CoverSize::Medium => image.thumbnails.large.as_ref(),
            CoverSize::Large => image.thumbnails.xlarge.as_ref(),
            CoverSize::Original => None,
        };
        thumbnail
            .filter(|url| !url.is_empty())
            .unwrap_or(&image.image)
            .clone()
    }
}

/// Cover Art Archive client
pub struct CoverArtClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    download_timeout: Duration,
}

impl CoverArtClient {
    pub fn new(
        http_client: reqwest::Client,
        retry: RetryPolicy,
        download_timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry,
            download_timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Locator of the front cover for a release.
    ///
    /// Prefers the image flagged `front`, otherwise the first listed image.
    /// `Ok(None)` when the release has no artwork at all.
    pub async fn front_cover_reference(
        &self,
        release_id: &str,
        size: CoverSize,
    ) -> Result<Option<String>, EnrichmentError> {
        let listing = match self.list_cover_art(release_id).await {
            Ok(listing) => listing,
            Err(EnrichmentError::NoMatches) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(select_front(&listing).map(|image| size.pick(image)))
    }

    /// List all cover art for a release
    pub async fn list_cover_art(
        &self,
        release_id: &str,
    ) -> Result<dto::CoverArtResponse, EnrichmentError> {
        let url = format!(
            "{}/release/{}",
            self.base_url,
            urlencoding::encode(release_id)
        );

        let response = http::send(&self.retry, "coverart listing", || {
            self.http_client
                .get(&url)
                .header(reqwest::header::ACCEPT, "application/json")
        })
        .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NoMatches);
        }

        if !status.is_success() {
            return Err(http::status_error(status));
        }

        response
            .json::<dto::CoverArtResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }

    /// Download an image payload from any URL.
    ///
    /// The server's Content-Type is ignored; callers sniff the bytes.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, EnrichmentError> {
        let response = http::send(&self.retry, "artwork download", || {
            self.http_client.get(url).timeout(self.download_timeout)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(http::status_error(status));
        }

        let data = response
            .bytes()
            .await
            .map_err(EnrichmentError::from_transport)?;
        Ok(data.to_vec())
    }
}

fn select_front(listing: &dto::CoverArtResponse) -> Option<&dto::Image> {
    listing
        .images
        .iter()
        .find(|image| image.front)
        .or_else(|| listing.images.first())
}
