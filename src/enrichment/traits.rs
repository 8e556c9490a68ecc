//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use music_retagger::enrichment::traits::RecognitionProvider;
//!
//! async fn first_guess(provider: &dyn RecognitionProvider, path: &Path) {
//!     let candidates = provider.recognize(path).await?;
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;

use super::coverart::CoverSize;
use super::domain::{EnrichmentError, RecognitionCandidate, RecordingDetails};

/// A service that identifies an audio file.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Short name used in logs and configuration ("acoustid", "audd").
    fn name(&self) -> &'static str;

    /// Identify the file. An empty list means the service found nothing.
    async fn recognize(&self, path: &Path) -> Result<Vec<RecognitionCandidate>, EnrichmentError>;
}

/// Trait for MusicBrainz metadata lookup.
#[async_trait]
pub trait MusicBrainzApi: Send + Sync {
    /// Look up a recording by its MusicBrainz ID.
    async fn lookup_recording(&self, recording_id: &str)
    -> Result<RecordingDetails, EnrichmentError>;
}

/// Trait for Cover Art Archive lookup.
#[async_trait]
pub trait CoverArtApi: Send + Sync {
    /// Locator of the front cover for a release, if it has any artwork.
    async fn front_cover_reference(
        &self,
        release_id: &str,
        size: CoverSize,
    ) -> Result<Option<String>, EnrichmentError>;
}

/// Plain HTTP image download.
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    async fn download_image(&self, url: &str) -> Result<Vec<u8>, EnrichmentError>;
}

// Implement traits for real clients

#[async_trait]
impl MusicBrainzApi for super::musicbrainz::MusicBrainzClient {
    async fn lookup_recording(
        &self,
        recording_id: &str,
    ) -> Result<RecordingDetails, EnrichmentError> {
        self.lookup_recording(recording_id).await
    }
}

#[async_trait]
impl CoverArtApi for super::coverart::CoverArtClient {
    async fn front_cover_reference(
        &self,
        release_id: &str,
        size: CoverSize,
    ) -> Result<Option<String>, EnrichmentError> {
        self.front_cover_reference(release_id, size).await
    }
}

#[async_trait]
impl ArtworkSource for super::coverart::CoverArtClient {
    async fn download_image(&self, url: &str) -> Result<Vec<u8>, EnrichmentError> {
        self.download_image(url).await
    }
}
