//! ID3v2 container probing and tag application.

use std::fs::File;
use std::path::Path;

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::id3::v1::Id3v1Tag;
use lofty::id3::v2::Id3v2Tag;
use lofty::mpeg::MpegFile;
use lofty::picture::{Picture, PictureType};
use lofty::tag::items::Timestamp;
use lofty::tag::{Accessor, ItemKey, MergeTag, SplitTag};

use super::{COVER_DESCRIPTION, LABEL_FIELD, PRODUCER_FIELD, TagSet, TagWriteError};

/// Whether a file already carries an ID3v2 tag
#[derive(Debug, Clone)]
pub enum Container {
    Existing(Id3v2Tag),
    Absent,
}

impl Container {
    /// Inspect `path` without modifying it.
    pub fn probe(path: &Path) -> Result<Self, TagWriteError> {
        let mpeg = read_mpeg(path)?;

        Ok(match mpeg.id3v2() {
            Some(tag) => Self::Existing(tag.clone()),
            None => Self::Absent,
        })
    }

    /// The tag to edit: the existing one, or a fresh one.
    pub fn into_tag(self) -> Id3v2Tag {
        match self {
            Self::Existing(tag) => tag,
            Self::Absent => Id3v2Tag::new(),
        }
    }
}

/// Apply `tags` to an ID3v2 tag.
///
/// Artist and title are always set; album and date only when present.
/// Existing PRODUCER/LABEL user-text frames are cleared before the new values
/// go in. A cover replaces every embedded image. Frames this crate doesn't
/// manage are kept.
pub fn apply(mut tag: Id3v2Tag, tags: &TagSet) -> Id3v2Tag {
    // Cleared before splitting so no generic key mapping carries old values over
    for field in [PRODUCER_FIELD, LABEL_FIELD] {
        tag.remove_user_text(field);
    }

    let (remainder, mut generic) = tag.split_tag();

    generic.set_artist(tags.artist.clone());
    generic.set_title(tags.title.clone());
    if let Some(album) = &tags.album {
        generic.set_album(album.clone());
    }
    if let Some(timestamp) = tags.date.as_deref().and_then(recording_timestamp) {
        generic.insert_text(ItemKey::RecordingDate, timestamp.to_string());
    }

    if let Some(cover) = &tags.cover {
        while !generic.pictures().is_empty() {
            generic.remove_picture(0);
        }
        generic.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(cover.format.lofty_mime()),
            Some(COVER_DESCRIPTION.to_string()),
            cover.data.clone(),
        ));
    }

    let mut id3 = remainder.merge_tag(generic);

    for (field, value) in [(PRODUCER_FIELD, &tags.producer), (LABEL_FIELD, &tags.label)] {
        if let Some(value) = value {
            id3.insert_user_text(field.to_string(), value.clone());
        }
    }

    id3
}

/// The ID3v1 tag at the end of `path`, if there is one.
pub fn probe_id3v1(path: &Path) -> Result<Option<Id3v1Tag>, TagWriteError> {
    Ok(read_mpeg(path)?.id3v1().cloned())
}

/// Bring an existing ID3v1 tag in line with `tags`.
///
/// Same rules as [`apply`]: artist and title always, album and year only
/// when present. ID3v1 has no room for label, producer or pictures.
pub fn apply_id3v1(mut tag: Id3v1Tag, tags: &TagSet) -> Id3v1Tag {
    tag.artist = Some(tags.artist.clone());
    tag.title = Some(tags.title.clone());
    if let Some(album) = &tags.album {
        tag.album = Some(album.clone());
    }
    if let Some(timestamp) = tags.date.as_deref().and_then(recording_timestamp) {
        tag.year = Some(format!("{:04}", timestamp.year));
    }
    tag
}

/// Parse a free-form release date into something TDRC can hold.
///
/// ISO 8601 prefixes are kept as-is. Anything else is reduced to the first
/// standalone four-digit year in it, or dropped.
pub fn recording_timestamp(date: &str) -> Option<Timestamp> {
    let date = date.trim();
    if let Ok(timestamp) = date.parse::<Timestamp>() {
        return Some(timestamp);
    }

    let year = date
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 4)
        .and_then(|run| run.parse::<u16>().ok());

    match year {
        Some(year) => {
            tracing::debug!(date, year, "release date reduced to its year");
            Some(Timestamp {
                year,
                ..Timestamp::default()
            })
        }
        None => {
            tracing::warn!(date, "release date is not a recognizable date, not written");
            None
        }
    }
}

fn read_mpeg(path: &Path) -> Result<MpegFile, TagWriteError> {
    let mut file = File::open(path).map_err(|e| TagWriteError::io(path, e))?;
    MpegFile::read_from(&mut file, ParseOptions::new().read_properties(false))
        .map_err(|e| TagWriteError::tag(path, e))
}
