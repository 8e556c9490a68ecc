//! Resolution stage: turn a recognition candidate into canonical metadata.
//!
//! Recording matches are looked up on MusicBrainz (and the Cover Art Archive
//! for a cover reference). Described records are normalized in place.

use std::sync::Arc;

use super::coverart::CoverSize;
use super::domain::{
    CanonicalMetadata, DescribedRecording, EnrichmentError, RecognitionCandidate, RecordingMatch,
};
use super::traits::{CoverArtApi, MusicBrainzApi};

/// Size substituted into Apple Music artwork templates
const APPLE_ARTWORK_SIZE: &str = "500x500";

/// The recording lookup failed, so no metadata can be trusted for this file.
#[derive(Debug, Clone, thiserror::Error)]
#[error("recording lookup for {recording_id} failed: {source}")]
pub struct ResolutionFailed {
    pub recording_id: String,
    #[source]
    pub source: EnrichmentError,
}

#[derive(Clone)]
pub struct MetadataResolver {
    musicbrainz: Arc<dyn MusicBrainzApi>,
    cover_art: Arc<dyn CoverArtApi>,
    cover_size: CoverSize,
}

impl MetadataResolver {
    pub fn new(
        musicbrainz: Arc<dyn MusicBrainzApi>,
        cover_art: Arc<dyn CoverArtApi>,
        cover_size: CoverSize,
    ) -> Self {
        Self {
            musicbrainz,
            cover_art,
            cover_size,
        }
    }

    pub async fn resolve(
        &self,
        candidate: RecognitionCandidate,
    ) -> Result<CanonicalMetadata, ResolutionFailed> {
        match candidate {
            RecognitionCandidate::Recording(m) => self.resolve_recording(m).await,
            RecognitionCandidate::Described(d) => Ok(normalize_described(d)),
        }
    }

    async fn resolve_recording(
        &self,
        candidate: RecordingMatch,
    ) -> Result<CanonicalMetadata, ResolutionFailed> {
        let details = self
            .musicbrainz
            .lookup_recording(&candidate.recording_id)
            .await
            .map_err(|source| ResolutionFailed {
                recording_id: candidate.recording_id.clone(),
                source,
            })?;

        let metadata = CanonicalMetadata::new(
            details.artist.or(candidate.artist),
            details.title.or(candidate.title),
        );

        let Some(release) = details.release else {
            return Ok(metadata);
        };

        let cover_reference = match self
            .cover_art
            .front_cover_reference(&release.id, self.cover_size)
            .await
        {
            Ok(reference) => reference,
            Err(e) => {
                tracing::debug!(release = %release.id, error = %e, "no cover art reference");
                None
            }
        };

        Ok(metadata
            .with_album(release.title)
            .with_release_date(release.date)
            .with_cover_reference(cover_reference))
    }
}

/// Total mapping from a described record. Cannot fail.
///
/// Artwork locators are tried in order: Spotify, Deezer, then the Apple
/// Music template at 500x500.
pub fn normalize_described(described: DescribedRecording) -> CanonicalMetadata {
    let artwork = described.artwork;
    let cover_reference = artwork
        .spotify
        .filter(|url| !url.trim().is_empty())
        .or_else(|| artwork.deezer.filter(|url| !url.trim().is_empty()))
        .or_else(|| {
            artwork
                .apple_music_template
                .filter(|url| !url.trim().is_empty())
                .map(|template| template.replace("{w}x{h}", APPLE_ARTWORK_SIZE))
        });

    CanonicalMetadata::new(described.artist, described.title)
        .with_album(described.album)
        .with_release_date(described.release_date)
        .with_label(described.label)
        .with_cover_reference(cover_reference)
}
