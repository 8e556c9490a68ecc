//! Cover art payloads and their acquisition.
//!
//! - **Detection** (`detect.rs`) - image container from magic bytes
//! - **Acquisition** (`acquirer.rs`) - reference URL to bytes, never failing
//!
//! Missing art is a normal outcome: every operation here degrades to `None`.

mod acquirer;
mod detect;

pub use acquirer::CoverArtAcquirer;
pub use detect::{detect_format, sniff};

use lofty::picture::MimeType;

/// Image container of a cover payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::WebP => "image/webp",
            Self::Tiff => "image/tiff",
        }
    }

    /// MIME type as written into an APIC frame
    pub fn lofty_mime(self) -> MimeType {
        match self {
            Self::Jpeg => MimeType::Jpeg,
            Self::Png => MimeType::Png,
            Self::Gif => MimeType::Gif,
            Self::Bmp => MimeType::Bmp,
            Self::Tiff => MimeType::Tiff,
            Self::WebP => MimeType::Unknown(self.mime_type().to_string()),
        }
    }
}

/// Downloaded cover art ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct CoverArt {
    /// Raw image bytes, never empty
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl CoverArt {
    /// Wrap a payload, detecting its format. Empty payloads are not cover art.
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let format = detect_format(&data);
        Some(Self { data, format })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
