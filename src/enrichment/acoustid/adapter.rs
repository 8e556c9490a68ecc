//! Adapter layer: Convert AcoustID DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{EnrichmentError, RecognitionSource, RecordingMatch, non_empty};

/// Convert an AcoustID lookup response to recording matches.
///
/// Every recording of every result becomes one match carrying the result's
/// score. Results without recordings are dropped.
pub fn to_matches(response: dto::LookupResponse) -> Result<Vec<RecordingMatch>, EnrichmentError> {
    if response.status != "ok" {
        let error = response.error.unwrap_or(dto::ApiError {
            code: -1,
            message: "Unknown error".to_string(),
        });
        return Err(EnrichmentError::ApiError(error.message));
    }

    Ok(response
        .results
        .into_iter()
        .flat_map(|result| {
            let score = result.score;
            result
                .recordings
                .into_iter()
                .map(move |recording| convert_recording(recording, score))
        })
        .collect())
}

fn convert_recording(recording: dto::Recording, score: f32) -> RecordingMatch {
    RecordingMatch {
        artist: join_artists(&recording.artists),
        title: non_empty(recording.title),
        recording_id: recording.id,
        score,
        source: RecognitionSource::AcoustId,
    }
}

/// Join credited artists with their join phrases ("Queen & David Bowie").
fn join_artists(artists: &[dto::Artist]) -> Option<String> {
    let joined: String = artists
        .iter()
        .map(|a| format!("{}{}", a.name, a.joinphrase.as_deref().unwrap_or("")))
        .collect();
    non_empty(Some(joined))
}
