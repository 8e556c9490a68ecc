//! Music recognition and metadata resolution against external services.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`acoustid/dto.rs`, `audd/dto.rs`, `musicbrainz/dto.rs`, `coverart/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs, built on `http.rs`
//! - **Recognizer** / **Resolver** - The two pipeline stages that use the clients
//!
//! API changes stay inside one provider directory; the stages only see
//! domain types through the traits in `traits.rs`.
//!
//! # Usage
//!
//! ```ignore
//! let recognizer = Recognizer::new(vec![acoustid, audd], 0.5);
//! let resolver = MetadataResolver::new(musicbrainz, cover_art, CoverSize::Medium);
//!
//! if let Some(candidate) = recognizer.identify(Path::new("song.mp3")).await {
//!     let metadata = resolver.resolve(candidate).await?;
//!     println!("{} - {}", metadata.artist, metadata.title);
//! }
//! ```

pub mod acoustid;
pub mod audd;
pub mod coverart;
pub mod domain;
pub mod fingerprint;
pub mod http;
pub mod musicbrainz;
pub mod recognizer;
pub mod resolver;
pub mod throttle;
pub mod traits;

pub use coverart::{CoverArtClient, CoverSize};
pub use domain::{
    AudioFingerprint, CanonicalMetadata, DescribedRecording, EnrichmentError,
    RecognitionCandidate, RecordingMatch,
};
pub use recognizer::Recognizer;
pub use resolver::{MetadataResolver, ResolutionFailed};
