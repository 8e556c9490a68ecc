//! Image container detection from magic bytes.
//!
//! Artwork hosts are not trusted to report a correct Content-Type, so the
//! payload itself decides.

use super::ImageFormat;

/// Detect the image container of `data`, or `None` if no signature matches.
pub fn sniff(data: &[u8]) -> Option<ImageFormat> {
    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }
    // PNG: 0x89 'P' 'N' 'G'
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some(ImageFormat::Png);
    }
    if data.starts_with(b"GIF8") {
        return Some(ImageFormat::Gif);
    }
    if data.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }
    // WebP: "RIFF" <size> "WEBP"
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }
    // TIFF, little- and big-endian
    if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
        return Some(ImageFormat::Tiff);
    }
    None
}

/// Like [`sniff`], defaulting to JPEG when nothing matches.
pub fn detect_format(data: &[u8]) -> ImageFormat {
    sniff(data).unwrap_or(ImageFormat::Jpeg)
}
