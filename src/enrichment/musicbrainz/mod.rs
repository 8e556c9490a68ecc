//! MusicBrainz API integration
//!
//! Resolves a recording MBID (typically from AcoustID) into title, primary
//! artist and release.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_details;
pub use client::MusicBrainzClient;
