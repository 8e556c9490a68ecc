//! Cover Art Archive integration
//!
//! Finds album artwork on coverartarchive.org using MusicBrainz release IDs.
//! No API key required.

pub mod dto;
mod client;

pub use client::{CoverArtClient, CoverSize};
