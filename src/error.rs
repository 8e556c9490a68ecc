//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`EnrichmentError`](crate::enrichment::EnrichmentError),
//!   [`TagWriteError`](crate::metadata::TagWriteError),
//!   [`ConfigError`](crate::config::ConfigError)) for detailed handling
//! - Per-file pipeline failures are outcomes, not errors: only setup
//!   problems surface as [`Error`]

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Recognition or lookup error
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] crate::enrichment::EnrichmentError),

    /// Tag writing error
    #[error(transparent)]
    TagWrite(#[from] crate::metadata::TagWriteError),

    /// A required directory is missing
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// No recognition provider could be set up
    #[error("No recognition provider configured: {0}")]
    NoProvider(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a missing directory error.
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory(path.into())
    }

    /// Create a no-provider error.
    pub fn no_provider(message: impl Into<String>) -> Self {
        Self::NoProvider(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
