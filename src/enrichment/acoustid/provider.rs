//! AcoustID as a recognition provider: fingerprint locally, then look up.

use std::path::Path;

use async_trait::async_trait;

use super::AcoustIdClient;
use crate::enrichment::domain::{EnrichmentError, RecognitionCandidate};
use crate::enrichment::fingerprint::Fingerprinter;
use crate::enrichment::traits::RecognitionProvider;

pub struct AcoustIdProvider {
    client: AcoustIdClient,
    fingerprinter: Fingerprinter,
}

impl AcoustIdProvider {
    pub fn new(client: AcoustIdClient, fingerprinter: Fingerprinter) -> Self {
        Self {
            client,
            fingerprinter,
        }
    }
}

#[async_trait]
impl RecognitionProvider for AcoustIdProvider {
    fn name(&self) -> &'static str {
        "acoustid"
    }

    async fn recognize(&self, path: &Path) -> Result<Vec<RecognitionCandidate>, EnrichmentError> {
        let fingerprinter = self.fingerprinter.clone();
        let owned = path.to_path_buf();
        let fingerprint = tokio::task::spawn_blocking(move || fingerprinter.fingerprint(&owned))
            .await
            .map_err(|e| EnrichmentError::FingerprintError(format!("fpcalc task failed: {}", e)))??;

        tracing::debug!(
            file = %path.display(),
            duration_secs = fingerprint.duration_secs,
            "fingerprint generated"
        );

        let matches = self.client.lookup(&fingerprint).await?;
        Ok(matches.into_iter().map(RecognitionCandidate::Recording).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::http::{self, RetryPolicy};
    use std::time::Duration;

    #[tokio::test]
    async fn test_missing_fpcalc_is_error_not_panic() {
        let client = AcoustIdClient::new(
            "key",
            http::build_client(http::USER_AGENT, Duration::from_secs(1)),
            RetryPolicy::none(),
        );
        let provider =
            AcoustIdProvider::new(client, Fingerprinter::with_program("/nonexistent/fpcalc"));

        let result = provider.recognize(Path::new("/nonexistent/song.mp3")).await;
        assert!(matches!(result, Err(EnrichmentError::FingerprintError(_))));
        assert_eq!(provider.name(), "acoustid");
    }
}
