//! AudD HTTP client
//!
//! AudD recognizes a song from the uploaded audio itself, so no local
//! fingerprinting is needed. The whole file is sent as a multipart upload.
//! See: https://docs.audd.io/

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{adapter, dto};
use crate::enrichment::domain::{DescribedRecording, EnrichmentError, RecognitionCandidate};
use crate::enrichment::http::{self, RetryPolicy};
use crate::enrichment::traits::RecognitionProvider;

const DEFAULT_BASE_URL: &str = "https://api.audd.io/";

/// Platform blocks requested alongside the match
const RETURN_FIELDS: &str = "apple_music,deezer,spotify";

/// AudD API client
pub struct AudDClient {
    api_token: String,
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl AudDClient {
    pub fn new(
        api_token: impl Into<String>,
        http_client: reqwest::Client,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Upload a file and return the described recording, if recognized
    pub async fn recognize_file(
        &self,
        path: &Path,
    ) -> Result<Option<DescribedRecording>, EnrichmentError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EnrichmentError::Input(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let response = self.send_recognize_request(&bytes, &file_name).await?;
        adapter::to_described(response)
    }

    fn form(&self, bytes: &[u8], file_name: &str) -> Form {
        Form::new()
            .text("api_token", self.api_token.clone())
            .text("return", RETURN_FIELDS)
            .part("file", Part::bytes(bytes.to_vec()).file_name(file_name.to_string()))
    }

    async fn send_recognize_request(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<dto::RecognizeResponse, EnrichmentError> {
        let response = http::send(&self.retry, "audd recognize", || {
            self.http_client
                .post(&self.base_url)
                .multipart(self.form(bytes, file_name))
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(http::status_error(status));
        }

        response
            .json::<dto::RecognizeResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RecognitionProvider for AudDClient {
    fn name(&self) -> &'static str {
        "audd"
    }

    async fn recognize(&self, path: &Path) -> Result<Vec<RecognitionCandidate>, EnrichmentError> {
        Ok(self
            .recognize_file(path)
            .await?
            .map(RecognitionCandidate::Described)
            .into_iter()
            .collect())
    }
}
