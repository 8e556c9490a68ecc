//! AudD API integration
//!
//! AudD recognizes music from an uploaded clip and answers with a
//! denormalized record including Spotify, Deezer and Apple Music blocks.
//! Requires an API token from https://audd.io

mod adapter;
mod client;
pub mod dto;

pub use adapter::to_described;
pub use client::AudDClient;
