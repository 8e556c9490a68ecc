//! Configuration system using TOML files.
//!
//! Config is read from the OS-standard config directory unless a path is
//! given with `--config`:
//! - Windows: %APPDATA%\music-retagger\config.toml
//! - macOS: ~/Library/Application Support/music-retagger/config.toml
//! - Linux: ~/.config/music-retagger/config.toml
//!
//! Every section is optional. Environment variables and command-line flags
//! are layered on top by the CLI, and the result is passed by value into the
//! pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrichment::coverart::CoverSize;
use crate::enrichment::http::RetryPolicy;
use crate::metadata::ExistingPolicy;

/// Default name of the durable per-file log
pub const DEFAULT_LOG_FILE: &str = "recognition_log.txt";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,

    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    pub recognition: RecognitionConfig,

    pub network: NetworkConfig,

    pub artwork: ArtworkConfig,

    pub batch: BatchConfig,
}

/// Input, output and log locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for input files
    pub source: Option<PathBuf>,
    /// Root of the organized output tree
    pub target: Option<PathBuf>,
    /// Append-only log file
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// API credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// AcoustID API key for fingerprint lookups
    pub acoustid_api_key: Option<String>,

    /// AudD API token for upload recognition
    pub audd_api_token: Option<String>,
}

/// Recognition provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Providers in the order they are consulted
    pub providers: Vec<String>,

    /// Candidates scoring below this are discarded (0.0 - 1.0)
    pub min_confidence: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            providers: vec!["acoustid".to_string(), "audd".to_string()],
            min_confidence: 0.5,
        }
    }
}

/// Timeouts, retries and rate limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    pub artwork_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Minimum spacing between MusicBrainz requests
    pub musicbrainz_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            artwork_timeout_secs: 15,
            max_retries: 2,
            retry_backoff_ms: 500,
            musicbrainz_interval_ms: 1100,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn artwork_timeout(&self) -> Duration {
        Duration::from_secs(self.artwork_timeout_secs)
    }

    pub fn musicbrainz_interval(&self) -> Duration {
        Duration::from_millis(self.musicbrainz_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }
}

/// Cover art preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    /// Cover Art Archive size: small, medium, large or original
    pub size: CoverSize,
}

/// Batch processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed at the same time
    pub concurrency: usize,

    /// What to do when the output file already exists
    pub on_existing: ExistingPolicy,

    /// Input file extension, without the dot
    pub extension: String,

    /// Scan subdirectories of the source
    pub recursive: bool,

    /// Exit non-zero when failed / processed exceeds this (1.0 = never)
    pub max_failure_ratio: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            on_existing: ExistingPolicy::Skip,
            extension: "mp3".to_string(),
            recursive: false,
            max_failure_ratio: 1.0,
        }
    }
}

impl Config {
    /// Check the settings that can't be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.concurrency == 0 {
            return Err(ConfigError::Invalid("batch.concurrency must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.recognition.min_confidence) {
            return Err(ConfigError::Invalid(
                "recognition.min_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.batch.max_failure_ratio) {
            return Err(ConfigError::Invalid(
                "batch.max_failure_ratio must be between 0.0 and 1.0".into(),
            ));
        }
        if self.batch.extension.trim().is_empty() {
            return Err(ConfigError::Invalid("batch.extension must not be empty".into()));
        }
        if let Some(unknown) = self
            .recognition
            .providers
            .iter()
            .find(|p| !matches!(p.as_str(), "acoustid" | "audd"))
        {
            return Err(ConfigError::Invalid(format!(
                "unknown recognition provider '{}'",
                unknown
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-retagger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// An explicit path must exist and parse. The default location is optional:
/// when it is missing (or no config directory exists) defaults are used.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) if path.exists() => path,
            Some(path) => {
                tracing::debug!("No config file found at {:?}, using defaults", path);
                return Ok(Config::default());
            }
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let contents =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
