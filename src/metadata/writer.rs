//! Produce a tagged copy of a source file at its organized location.
//!
//! The copy is built in a staging file next to the target and only published
//! once its tag is saved, so a failed write never leaves a partial file at
//! the target path. The source file is only ever read.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lofty::config::WriteOptions;
use lofty::tag::TagExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{Container, TagSet, TagWriteError, apply, apply_id3v1, probe_id3v1};
use crate::organizer::{self, TargetLocks};

/// What to do when the target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingPolicy {
    /// Leave the existing file alone and report the track as skipped
    #[default]
    Skip,
    /// Replace the existing file
    Overwrite,
}

/// Result of a successful write call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    SkippedExisting(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::SkippedExisting(path) => path,
        }
    }
}

/// Writes tagged copies under an output root
#[derive(Debug, Clone)]
pub struct TagWriter {
    output_root: PathBuf,
    extension: String,
    policy: ExistingPolicy,
    locks: Arc<TargetLocks>,
}

impl TagWriter {
    pub fn new(output_root: impl Into<PathBuf>, policy: ExistingPolicy) -> Self {
        Self {
            output_root: output_root.into(),
            extension: "mp3".to_string(),
            policy,
            locks: Arc::new(TargetLocks::new()),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn policy(&self) -> ExistingPolicy {
        self.policy
    }

    /// Where a track with this identity would be written.
    pub fn target_for(&self, tags: &TagSet) -> PathBuf {
        organizer::target_path(&self.output_root, &tags.artist, &tags.title, &self.extension)
    }

    /// Copy `source` to its target path and write `tags` into the copy.
    ///
    /// Blocking: call from a blocking-capable context.
    pub fn write(&self, source: &Path, tags: &TagSet) -> Result<WriteOutcome, TagWriteError> {
        let target = self.target_for(tags);
        let artist_dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_root.clone());

        fs::create_dir_all(&artist_dir).map_err(|e| TagWriteError::io(&artist_dir, e))?;

        self.locks.with_lock(&target, || {
            self.write_locked(source, tags, &artist_dir, &target)
        })
    }

    fn write_locked(
        &self,
        source: &Path,
        tags: &TagSet,
        artist_dir: &Path,
        target: &Path,
    ) -> Result<WriteOutcome, TagWriteError> {
        if self.policy == ExistingPolicy::Skip && target.exists() {
            return Ok(WriteOutcome::SkippedExisting(target.to_path_buf()));
        }

        let staging = stage_copy(source, artist_dir)?;

        let tag = Container::probe(staging.path())?.into_tag();
        apply(tag, tags)
            .save_to_path(staging.path(), WriteOptions::default())
            .map_err(|e| TagWriteError::tag(staging.path(), e))?;

        // A stale ID3v1 block would still name the old track
        if let Some(v1) = probe_id3v1(staging.path())? {
            apply_id3v1(v1, tags)
                .save_to_path(staging.path(), WriteOptions::default())
                .map_err(|e| TagWriteError::tag(staging.path(), e))?;
        }

        self.publish(staging, target)
    }

    fn publish(
        &self,
        staging: NamedTempFile,
        target: &Path,
    ) -> Result<WriteOutcome, TagWriteError> {
        let persisted = match self.policy {
            ExistingPolicy::Skip => staging.persist_noclobber(target),
            ExistingPolicy::Overwrite => staging.persist(target),
        };

        match persisted {
            Ok(_) => Ok(WriteOutcome::Written(target.to_path_buf())),
            // Another process created the target after our existence check
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(WriteOutcome::SkippedExisting(target.to_path_buf()))
            }
            Err(e) => Err(TagWriteError::io(target, e.error)),
        }
    }
}

/// Copy `source` into a new staging file in `dir`, carrying over its
/// modification and access times. The staging file is deleted on drop.
fn stage_copy(source: &Path, dir: &Path) -> Result<NamedTempFile, TagWriteError> {
    let mut input = File::open(source).map_err(|e| TagWriteError::io(source, e))?;
    let source_meta = input.metadata().map_err(|e| TagWriteError::io(source, e))?;

    let mut staging = tempfile::Builder::new()
        .prefix(".retag-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| TagWriteError::io(dir, e))?;

    io::copy(&mut input, staging.as_file_mut())
        .map_err(|e| TagWriteError::io(staging.path(), e))?;

    let mut times = FileTimes::new();
    if let Ok(modified) = source_meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = source_meta.accessed() {
        times = times.set_accessed(accessed);
    }
    staging
        .as_file()
        .set_times(times)
        .map_err(|e| TagWriteError::io(staging.path(), e))?;
    staging
        .as_file()
        .sync_all()
        .map_err(|e| TagWriteError::io(staging.path(), e))?;

    Ok(staging)
}
