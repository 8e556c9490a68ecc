//! Audio file tag reading and writing.
//!
//! Uses the lofty crate for ID3v2 access on MP3 files.
//!
//! # Features
//! - Build the per-file [`TagSet`] from resolved metadata and cover art
//! - Probe a file's tag container explicitly ([`Container`])
//! - Write tagged copies atomically ([`TagWriter`])
//! - Read tags back for verification and the `identify` command

mod container;
mod writer;

pub use container::{Container, apply, apply_id3v1, probe_id3v1, recording_timestamp};
pub use writer::{ExistingPolicy, TagWriter, WriteOutcome};

use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::mpeg::MpegFile;
use lofty::picture::PictureType;
use lofty::tag::{Accessor, ItemKey, Tag};

use crate::cover::CoverArt;
use crate::enrichment::domain::CanonicalMetadata;

/// ID3v2 user-text description for the producer
pub const PRODUCER_FIELD: &str = "PRODUCER";
/// ID3v2 user-text description for the record label
pub const LABEL_FIELD: &str = "LABEL";
/// Description of embedded cover images
pub const COVER_DESCRIPTION: &str = "Cover";

/// Errors raised while producing a tagged copy
#[derive(Debug, thiserror::Error)]
pub enum TagWriteError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tag error on {}: {source}", path.display())]
    Tag {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("Tag write task failed: {0}")]
    Task(String),
}

impl TagWriteError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn tag(path: &Path, source: lofty::error::LoftyError) -> Self {
        Self::Tag {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Everything written into one file's tag. Built fresh per file.
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub date: Option<String>,
    pub producer: Option<String>,
    pub label: Option<String>,
    pub cover: Option<CoverArt>,
}

impl TagSet {
    pub fn from_resolved(metadata: &CanonicalMetadata, cover: Option<CoverArt>) -> Self {
        Self {
            artist: metadata.artist.clone(),
            title: metadata.title.clone(),
            album: metadata.album.clone(),
            date: metadata.release_date.clone(),
            producer: metadata.producer.clone(),
            label: metadata.label.clone(),
            cover,
        }
    }
}

/// Tags as read back from a file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub date: Option<String>,
    pub producer: Option<String>,
    pub label: Option<String>,
    /// Number of embedded images of any type
    pub picture_count: usize,
    /// Byte length of the embedded front cover, if any
    pub front_cover_len: Option<usize>,
}

/// Read the ID3v2 tag of an MP3 file. Files without a tag read as empty.
pub fn read(path: &Path) -> Result<TrackTags, TagWriteError> {
    let mut file = File::open(path).map_err(|e| TagWriteError::io(path, e))?;
    let mpeg = MpegFile::read_from(&mut file, ParseOptions::new())
        .map_err(|e| TagWriteError::tag(path, e))?;

    let Some(id3) = mpeg.id3v2() else {
        return Ok(TrackTags::default());
    };

    let producer = id3.get_user_text(PRODUCER_FIELD).map(str::to_string);
    let label = id3.get_user_text(LABEL_FIELD).map(str::to_string);

    let generic: Tag = id3.clone().into();
    let front_cover_len = generic
        .pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .map(|p| p.data().len());

    Ok(TrackTags {
        artist: generic.artist().map(|s| s.to_string()),
        title: generic.title().map(|s| s.to_string()),
        album: generic.album().map(|s| s.to_string()),
        date: generic.get_string(&ItemKey::RecordingDate).map(str::to_string),
        producer,
        label,
        picture_count: generic.picture_count() as usize,
        front_cover_len,
    })
}
