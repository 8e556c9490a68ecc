//! Tracing setup: console output plus the durable per-file log.
//!
//! The console layer goes to stderr and follows `RUST_LOG` (default
//! `music_retagger=warn`), so stdout stays free for progress lines. The file
//! layer appends plain timestamped lines at `info` for this crate only.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Console filter when `RUST_LOG` is unset
pub const DEFAULT_CONSOLE_FILTER: &str = "music_retagger=warn";

/// Open `path` for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Plain-text layer writing this crate's `info` events to `file`.
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file))
        .with_filter(Targets::new().with_target("music_retagger", LevelFilter::INFO))
}

/// Install the global subscriber. Without `log_file` only the console layer
/// is installed.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    let file = log_file.map(open_log_file).transpose()?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_filter(console_filter),
        )
        .with(file.map(file_layer))
        .try_init()?;

    Ok(())
}
