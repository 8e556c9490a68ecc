//! Recognition stage: ask providers who a file is.
//!
//! Providers are consulted in order. The first one that yields a usable
//! candidate wins; provider errors are logged and count as a miss.

use std::path::Path;
use std::sync::Arc;

use super::domain::RecognitionCandidate;
use super::traits::RecognitionProvider;

/// Runs the configured recognition providers against a file
#[derive(Clone)]
pub struct Recognizer {
    providers: Vec<Arc<dyn RecognitionProvider>>,
    min_confidence: f32,
}

impl Recognizer {
    pub fn new(providers: Vec<Arc<dyn RecognitionProvider>>, min_confidence: f32) -> Self {
        Self {
            providers,
            min_confidence,
        }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Best-effort identity for `path`, or `None` if nobody recognized it.
    pub async fn identify(&self, path: &Path) -> Option<RecognitionCandidate> {
        let file = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();

        for provider in &self.providers {
            let candidates = match provider.recognize(path).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::warn!(
                        file = %file,
                        provider = provider.name(),
                        error = %e,
                        "recognition provider failed"
                    );
                    continue;
                }
            };

            let found = candidates.len();
            match select_candidate(candidates, self.min_confidence) {
                Some(candidate) => {
                    tracing::debug!(
                        file = %file,
                        provider = provider.name(),
                        score = candidate.score(),
                        "recognized"
                    );
                    return Some(candidate);
                }
                None => tracing::debug!(
                    file = %file,
                    provider = provider.name(),
                    candidates = found,
                    "no usable candidate"
                ),
            }
        }

        None
    }
}

/// Highest-scoring complete candidate at or above `min_confidence`.
///
/// Ties keep the provider's own ordering.
pub fn select_candidate(
    mut candidates: Vec<RecognitionCandidate>,
    min_confidence: f32,
) -> Option<RecognitionCandidate> {
    candidates.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
        .into_iter()
        .filter(|c| c.score() >= min_confidence)
        .find(RecognitionCandidate::is_complete)
}
