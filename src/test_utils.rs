//! Test utilities and fixtures for music-retagger tests.
//!
//! This module provides common fixtures so tests don't each hand-roll
//! audio files and image payloads.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{write_mp3_fixture, sample_metadata};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("track.mp3");
//! write_mp3_fixture(&path);
//! ```

use std::path::Path;

use crate::enrichment::domain::CanonicalMetadata;

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no padding, no CRC
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// 144 * 128000 / 44100
const FRAME_LEN: usize = 417;
const FRAME_COUNT: usize = 20;

/// Bytes of a tagless MP3 stream made of silent frames.
pub fn mp3_fixture_bytes() -> Vec<u8> {
    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&FRAME_HEADER);
    frame.repeat(FRAME_COUNT)
}

/// Writes a tagless MP3 file that lofty can parse and tag.
pub fn write_mp3_fixture(path: &Path) {
    std::fs::write(path, mp3_fixture_bytes()).expect("Failed to write MP3 fixture");
}

/// A small payload with JPEG magic bytes.
pub fn sample_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    data.extend(std::iter::repeat_n(0x42, 64));
    data.extend([0xFF, 0xD9]);
    data
}

/// A small payload with PNG magic bytes.
pub fn sample_png() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend(std::iter::repeat_n(0x17, 32));
    data
}

/// Resolved metadata for a well-known track, with album and date.
pub fn sample_metadata() -> CanonicalMetadata {
    CanonicalMetadata::new(Some("Daft Punk".into()), Some("One More Time".into()))
        .with_album(Some("Discovery".into()))
        .with_release_date(Some("2000-11-30".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_fixture_layout() {
        let bytes = mp3_fixture_bytes();
        assert_eq!(bytes.len(), FRAME_LEN * FRAME_COUNT);
        assert_eq!(&bytes[..4], &FRAME_HEADER);
        assert_eq!(&bytes[FRAME_LEN..FRAME_LEN + 4], &FRAME_HEADER);
    }

    #[test]
    fn test_sample_images_have_magic_bytes() {
        assert_eq!(&sample_jpeg()[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(&sample_png()[..4], &[0x89, b'P', b'N', b'G']);
    }
}
