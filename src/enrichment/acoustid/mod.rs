//! AcoustID API integration
//!
//! AcoustID is a free service that identifies music by audio fingerprint.
//! API docs: https://acoustid.org/webservice

mod adapter;
mod client;
pub mod dto;
mod provider;

pub use adapter::to_matches;
pub use client::AcoustIdClient;
pub use provider::AcoustIdProvider;
