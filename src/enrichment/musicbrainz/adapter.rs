//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{RecordingDetails, ReleaseSummary, non_empty};

/// Convert a MusicBrainz recording response to recording details.
///
/// The primary artist is the first credited artist's official name, and the
/// release is the first one MusicBrainz lists.
pub fn to_details(response: dto::RecordingResponse) -> RecordingDetails {
    let artist = response
        .artist_credit
        .into_iter()
        .next()
        .and_then(|credit| non_empty(Some(credit.artist.name)));

    let release = response.releases.into_iter().next().map(|r| ReleaseSummary {
        id: r.id,
        title: non_empty(Some(r.title)),
        date: non_empty(r.date),
    });

    RecordingDetails {
        recording_id: response.id,
        title: non_empty(Some(response.title)),
        artist,
        release,
    }
}
