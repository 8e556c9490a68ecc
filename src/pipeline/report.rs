//! Optional JSON report of a finished batch.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::BatchSummary;

/// A batch summary plus where and when it ran
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub started_at: String,
    pub finished_at: String,
    pub source: PathBuf,
    pub target: PathBuf,
    pub failure_ratio: f64,
    #[serde(flatten)]
    pub summary: &'a BatchSummary,
}

impl<'a> BatchReport<'a> {
    pub fn new(
        summary: &'a BatchSummary,
        source: &Path,
        target: &Path,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            failure_ratio: summary.failure_ratio(),
            summary,
        }
    }
}

/// Write `report` as pretty JSON to `path`, replacing any previous report.
pub fn write_report(path: &Path, report: &BatchReport<'_>) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, json)
}
