//! Audio fingerprint generation using Chromaprint/fpcalc
//!
//! This module shells out to the `fpcalc` command-line tool (part of Chromaprint)
//! to generate audio fingerprints.
//!
//! Install fpcalc:
//! - Windows: `winget install AcoustID.Chromaprint` or download from https://acoustid.org/chromaprint
//! - macOS: `brew install chromaprint`
//! - Linux: `apt install libchromaprint-tools` or equivalent

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::enrichment::domain::{AudioFingerprint, EnrichmentError};

#[cfg(windows)]
const FPCALC_PATHS: &[&str] = &[
    "fpcalc",
    r"C:\Program Files\Chromaprint\fpcalc.exe",
    r"C:\Program Files\MusicBrainz Picard\fpcalc.exe",
    r"C:\Program Files (x86)\Chromaprint\fpcalc.exe",
];

#[cfg(not(windows))]
const FPCALC_PATHS: &[&str] = &[
    "fpcalc",
    "/usr/bin/fpcalc",
    "/usr/local/bin/fpcalc",
    "/opt/homebrew/bin/fpcalc",
];

/// Handle to a located `fpcalc` binary.
///
/// Locating the binary spawns a process per candidate path, so it is done
/// once per run rather than once per file.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    program: PathBuf,
}

impl Fingerprinter {
    /// Find fpcalc on the PATH or in a common install location.
    pub fn locate() -> Option<Self> {
        FPCALC_PATHS
            .iter()
            .find(|path| run_version(Path::new(path)).is_some())
            .map(|path| Self {
                program: PathBuf::from(path),
            })
    }

    /// Use a specific fpcalc binary without probing it.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// fpcalc version string (for `check-tools`)
    pub fn version(&self) -> Option<String> {
        run_version(&self.program)
    }

    /// Generate a fingerprint for the given file. Blocks on the child process.
    pub fn fingerprint(&self, path: &Path) -> Result<AudioFingerprint, EnrichmentError> {
        let output = Command::new(&self.program)
            .arg("-json")
            .arg(path)
            .output()
            .map_err(|e| {
                EnrichmentError::FingerprintError(format!("Failed to run fpcalc: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EnrichmentError::FingerprintError(format!(
                "fpcalc failed: {}",
                stderr.trim()
            )));
        }

        parse_fpcalc_json(&String::from_utf8_lossy(&output.stdout))
    }
}

fn run_version(program: &Path) -> Option<String> {
    Command::new(program)
        .arg("-version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// Parse the JSON output from fpcalc
fn parse_fpcalc_json(json: &str) -> Result<AudioFingerprint, EnrichmentError> {
    let parsed: FpcalcOutput = serde_json::from_str(json).map_err(|e| {
        EnrichmentError::FingerprintError(format!("Failed to parse fpcalc output: {}", e))
    })?;

    Ok(AudioFingerprint {
        fingerprint: parsed.fingerprint,
        duration_secs: parsed.duration.round() as u32,
    })
}

#[derive(serde::Deserialize)]
struct FpcalcOutput {
    fingerprint: String,
    duration: f64,
}
