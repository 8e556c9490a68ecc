//! AudD API Data Transfer Objects
//!
//! These types match what the AudD recognition endpoint returns when asked
//! for `return=apple_music,deezer,spotify`. Convert to domain types in the
//! adapter; nothing outside this module should see them.
//!
//! API Reference: https://docs.audd.io/
//!
//! Example response:
//! ```json
//! {
//!   "status": "success",
//!   "result": {
//!     "artist": "Daft Punk",
//!     "title": "One More Time",
//!     "album": "Discovery",
//!     "release_date": "2000-11-30",
//!     "label": "Virgin",
//!     "spotify": {"album": {"images": [{"url": "https://i.scdn.co/image/abc", "height": 640, "width": 640}]}},
//!     "deezer": {"album": {"cover_big": "https://e-cdns-images.dzcdn.net/images/cover/abc/500x500.jpg"}},
//!     "apple_music": {"artwork": {"url": "https://is1-ssl.mzstatic.com/image/abc/{w}x{h}bb.jpg"}}
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level recognition response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognizeResponse {
    /// "success" or "error"
    pub status: String,
    /// Null when the audio wasn't recognized
    pub result: Option<SongResult>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error_code: i32,
    pub error_message: String,
}

/// A recognized song with the requested platform blocks
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongResult {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// Usually YYYY-MM-DD, sometimes just a year
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub timecode: Option<String>,
    pub song_link: Option<String>,
    pub spotify: Option<Spotify>,
    pub deezer: Option<Deezer>,
    pub apple_music: Option<AppleMusic>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Spotify {
    pub album: Option<SpotifyAlbum>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyAlbum {
    pub name: Option<String>,
    /// Largest image first
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyImage {
    pub url: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Deezer {
    pub album: Option<DeezerAlbum>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeezerAlbum {
    pub title: Option<String>,
    pub cover: Option<String>,
    /// 500x500 cover
    pub cover_big: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppleMusic {
    pub artwork: Option<AppleArtwork>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppleArtwork {
    /// URL template containing `{w}x{h}`
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
