//! Adapter layer: Convert AudD DTOs to domain models

use super::dto;
use crate::enrichment::domain::{ArtworkLocators, DescribedRecording, EnrichmentError, non_empty};

/// Convert a recognition response into a described recording.
///
/// Returns `Ok(None)` when AudD answered but did not recognize the audio.
pub fn to_described(
    response: dto::RecognizeResponse,
) -> Result<Option<DescribedRecording>, EnrichmentError> {
    if response.status != "success" {
        let message = response
            .error
            .map(|e| format!("{} (code {})", e.error_message, e.error_code))
            .unwrap_or_else(|| format!("status {}", response.status));
        return Err(EnrichmentError::ApiError(message));
    }

    Ok(response.result.map(convert_result))
}

fn convert_result(result: dto::SongResult) -> DescribedRecording {
    let artwork = ArtworkLocators {
        spotify: result
            .spotify
            .and_then(|s| s.album)
            .and_then(|a| a.images.into_iter().next())
            .and_then(|i| non_empty(i.url)),
        deezer: result
            .deezer
            .and_then(|d| d.album)
            .and_then(|a| non_empty(a.cover_big)),
        apple_music_template: result
            .apple_music
            .and_then(|m| m.artwork)
            .and_then(|a| non_empty(a.url)),
    };

    DescribedRecording {
        artist: non_empty(result.artist),
        title: non_empty(result.title),
        album: non_empty(result.album),
        release_date: non_empty(result.release_date),
        label: non_empty(result.label),
        artwork,
    }
}
