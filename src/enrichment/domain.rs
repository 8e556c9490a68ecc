//! Internal domain models for recognition and metadata resolution.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

/// Artist placeholder used when no provider supplies one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Title placeholder used when no provider supplies one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Which recognition service produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionSource {
    AcoustId,
    AudD,
}

impl std::fmt::Display for RecognitionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AcoustId => f.write_str("acoustid"),
            Self::AudD => f.write_str("audd"),
        }
    }
}

/// A provider's best guess at a file's identity, possibly incomplete.
///
/// Each variant is one provider response shape. The resolver maps every
/// variant into [`CanonicalMetadata`] explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionCandidate {
    /// Opaque recording identifier that still needs a metadata lookup
    Recording(RecordingMatch),
    /// Denormalized record that already carries descriptive fields
    Described(DescribedRecording),
}

/// Fingerprint match pointing at a MusicBrainz recording
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingMatch {
    /// MusicBrainz recording ID
    pub recording_id: String,
    pub artist: Option<String>,
    pub title: Option<String>,
    /// Match confidence (0.0 to 1.0)
    pub score: f32,
    pub source: RecognitionSource,
}

/// Recognition result that already contains descriptive metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribedRecording {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// Free-form release date as reported by the provider
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub artwork: ArtworkLocators,
}

/// Per-platform artwork locators attached to a described recording
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtworkLocators {
    /// First Spotify album image
    pub spotify: Option<String>,
    /// Deezer `cover_big`
    pub deezer: Option<String>,
    /// Apple Music artwork URL with a `{w}x{h}` size template
    pub apple_music_template: Option<String>,
}

impl RecognitionCandidate {
    pub fn artist(&self) -> Option<&str> {
        match self {
            Self::Recording(m) => m.artist.as_deref(),
            Self::Described(d) => d.artist.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Recording(m) => m.title.as_deref(),
            Self::Described(d) => d.title.as_deref(),
        }
    }

    /// Confidence score. Described records carry no score and count as certain.
    pub fn score(&self) -> f32 {
        match self {
            Self::Recording(m) => m.score,
            Self::Described(_) => 1.0,
        }
    }

    pub fn source(&self) -> RecognitionSource {
        match self {
            Self::Recording(m) => m.source,
            Self::Described(_) => RecognitionSource::AudD,
        }
    }

    /// True when both artist and title are present and non-blank.
    pub fn is_complete(&self) -> bool {
        let filled = |s: Option<&str>| s.is_some_and(|s| !s.trim().is_empty());
        filled(self.artist()) && filled(self.title())
    }
}

/// Recording details returned by a metadata lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingDetails {
    pub recording_id: String,
    pub title: Option<String>,
    /// Primary (first credited) artist
    pub artist: Option<String>,
    /// First release the recording appears on
    pub release: Option<ReleaseSummary>,
}

/// The subset of a release used for tagging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseSummary {
    pub id: String,
    pub title: Option<String>,
    pub date: Option<String>,
}

/// Reconciled, file-independent descriptive record for a recording.
///
/// `artist` and `title` are always filled, falling back to placeholders.
/// Optional fields never hold empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMetadata {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub producer: Option<String>,
    /// Locator of the cover image, fetched later by the acquirer
    pub cover_reference: Option<String>,
}

impl CanonicalMetadata {
    /// Build from possibly-missing artist/title, substituting placeholders.
    pub fn new(artist: Option<String>, title: Option<String>) -> Self {
        Self {
            artist: non_empty(artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            title: non_empty(title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            album: None,
            release_date: None,
            label: None,
            producer: None,
            cover_reference: None,
        }
    }

    pub fn with_album(mut self, album: Option<String>) -> Self {
        self.album = non_empty(album);
        self
    }

    pub fn with_release_date(mut self, date: Option<String>) -> Self {
        self.release_date = non_empty(date);
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = non_empty(label);
        self
    }

    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.producer = non_empty(producer);
        self
    }

    pub fn with_cover_reference(mut self, reference: Option<String>) -> Self {
        self.cover_reference = non_empty(reference);
        self
    }
}

/// Collapse blank strings to `None` and trim surrounding whitespace.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Audio fingerprint for a track
#[derive(Debug, Clone)]
pub struct AudioFingerprint {
    /// The fingerprint string (Chromaprint format)
    pub fingerprint: String,
    /// Duration of the audio in seconds (required by AcoustID)
    pub duration_secs: u32,
}

/// Errors that can occur while talking to recognition and metadata services
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Failed to generate fingerprint: {0}")]
    FingerprintError(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Failed to read input: {0}")]
    Input(String),
}

impl EnrichmentError {
    /// Classify a transport-level reqwest failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Whether a retry may succeed (timeouts, connection failures, 5xx, 429).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
