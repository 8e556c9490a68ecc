//! Batch pipeline: recognize, resolve, fetch art and write, once per file.
//!
//! Every input file ends in exactly one [`FileOutcome`]. Failures are values
//! here, so one bad file never stops the batch; [`BatchSummary`] counts them
//! from the collected reports.

mod orchestrator;
mod report;

pub use orchestrator::{BatchOrchestrator, Stages};
pub use report::{write_report, BatchReport};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::enrichment::domain::{CanonicalMetadata, RecognitionSource};

/// Pipeline stage a file failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Recognition,
    Resolution,
    TagWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognition => f.write_str("recognition"),
            Self::Resolution => f.write_str("resolution"),
            Self::TagWrite => f.write_str("tag write"),
        }
    }
}

/// A stage failure with its cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub reason: String,
}

impl StageFailure {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.reason)
    }
}

/// Recognition plus resolution for one file, before anything is written
#[derive(Debug, Clone, PartialEq)]
pub struct Identified {
    pub source: RecognitionSource,
    pub score: f32,
    pub metadata: CanonicalMetadata,
}

/// Terminal state of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Tagged copy written. `with_art` is false when artwork was unavailable.
    Succeeded { target: PathBuf, with_art: bool },
    /// Nothing written; the reason says why
    Skipped { target: PathBuf, reason: String },
    Failed { stage: Stage, reason: String },
}

impl From<StageFailure> for FileOutcome {
    fn from(failure: StageFailure) -> Self {
        Self::Failed {
            stage: failure.stage,
            reason: failure.reason,
        }
    }
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One file and how it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    /// File name for progress lines and logs
    pub fn display_name(&self) -> String {
        display_name(&self.file)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Aggregate result of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files without embedded artwork among the succeeded ones
    pub without_art: usize,
    /// Per-file outcomes, sorted by path
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn from_reports(mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.file.cmp(&b.file));

        let mut summary = Self::default();
        for report in &files {
            match &report.outcome {
                FileOutcome::Succeeded { with_art, .. } => {
                    summary.succeeded += 1;
                    if !with_art {
                        summary.without_art += 1;
                    }
                }
                FileOutcome::Skipped { .. } => summary.skipped += 1,
                FileOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary.files = files;
        summary
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Failed / processed, 0.0 for an empty batch
    pub fn failure_ratio(&self) -> f64 {
        match self.processed() {
            0 => 0.0,
            n => self.failed as f64 / n as f64,
        }
    }

    /// Whether the failure ratio is above `max_ratio`.
    pub fn exceeds(&self, max_ratio: f64) -> bool {
        self.failure_ratio() > max_ratio
    }
}
