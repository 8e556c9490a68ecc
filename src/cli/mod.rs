//! Command-line interface for music-retagger.
//!
//! Each subcommand is implemented in its own module under `commands`:
//! - `run`: batch recognition and tagging of a directory
//! - `identify`: recognize and resolve a single file, writing nothing
//! - `tools`: tool/credential checks and config file creation

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::metadata::ExistingPolicy;

/// Music Retagger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Recognize every file in a directory and write tagged copies
    Run(RunArgs),
    /// Recognize and resolve one file and print the result
    Identify {
        /// Path to the audio file
        path: PathBuf,
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Check if fingerprinting tools and credentials are available
    CheckTools {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Where to write it (default: the OS config directory)
        path: Option<PathBuf>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// API credentials, from flags or the environment
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// AcoustID API key (or set ACOUSTID_API_KEY env var)
    #[arg(long, env = "ACOUSTID_API_KEY", hide_env_values = true)]
    pub acoustid_key: Option<String>,
    /// AudD API token (or set AUDD_API_TOKEN env var)
    #[arg(long, env = "AUDD_API_TOKEN", hide_env_values = true)]
    pub audd_token: Option<String>,
}

impl CredentialArgs {
    /// Layer these credentials over the config file's.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.acoustid_key {
            config.credentials.acoustid_api_key = Some(key.clone());
        }
        if let Some(token) = &self.audd_token {
            config.credentials.audd_api_token = Some(token.clone());
        }
    }
}

/// Options for the `run` command. Unset options keep the config file value.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory containing the input files
    #[arg(short, long)]
    pub source: Option<PathBuf>,
    /// Root directory for the tagged copies
    #[arg(short, long)]
    pub target: Option<PathBuf>,
    #[command(flatten)]
    pub credentials: CredentialArgs,
    /// Files processed at the same time
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
    /// Replace existing output files instead of skipping them
    #[arg(long)]
    pub overwrite: bool,
    /// Scan subdirectories of the source
    #[arg(short, long)]
    pub recursive: bool,
    /// Append-only log of every processed file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Exit with an error when more than this fraction of files fail (0.0-1.0)
    #[arg(long)]
    pub max_failure_ratio: Option<f64>,
    /// Write a JSON report of the batch to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RunArgs {
    /// Layer the command-line options over `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.paths.source = Some(source.clone());
        }
        if let Some(target) = &self.target {
            config.paths.target = Some(target.clone());
        }
        if let Some(log_file) = &self.log_file {
            config.paths.log_file = log_file.clone();
        }
        self.credentials.apply(config);
        if let Some(concurrency) = self.concurrency {
            config.batch.concurrency = concurrency;
        }
        if self.overwrite {
            config.batch.on_existing = ExistingPolicy::Overwrite;
        }
        if self.recursive {
            config.batch.recursive = true;
        }
        if let Some(ratio) = self.max_failure_ratio {
            config.batch.max_failure_ratio = ratio;
        }
    }
}

/// Run the parsed command and return the process exit code.
pub fn run_command(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Run(args) => commands::cmd_run(cli.config.as_deref(), args),
        Commands::Identify { path, credentials } => {
            commands::cmd_identify(cli.config.as_deref(), path, credentials)
        }
        Commands::CheckTools { credentials } => {
            commands::cmd_check_tools(cli.config.as_deref(), credentials)
        }
        Commands::InitConfig { path, force } => commands::cmd_init_config(path.as_deref(), *force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_override_config() {
        let cli = Cli::try_parse_from([
            "music-retagger",
            "run",
            "--source",
            "/music/in",
            "--target",
            "/music/out",
            "-j",
            "8",
            "--overwrite",
            "--recursive",
            "--max-failure-ratio",
            "0.2",
            "--acoustid-key",
            "flag-key",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let mut config = Config::default();
        config.batch.concurrency = 2;
        args.apply(&mut config);

        assert_eq!(config.paths.source, Some(PathBuf::from("/music/in")));
        assert_eq!(config.paths.target, Some(PathBuf::from("/music/out")));
        assert_eq!(config.batch.concurrency, 8);
        assert_eq!(config.batch.on_existing, ExistingPolicy::Overwrite);
        assert!(config.batch.recursive);
        assert_eq!(config.batch.max_failure_ratio, 0.2);
        assert_eq!(config.credentials.acoustid_api_key.as_deref(), Some("flag-key"));
    }

    #[test]
    fn test_unset_run_args_keep_config_values() {
        let mut config = Config::default();
        config.paths.source = Some(PathBuf::from("/from/file"));
        config.batch.on_existing = ExistingPolicy::Overwrite;
        config.batch.concurrency = 3;

        RunArgs::default().apply(&mut config);

        assert_eq!(config.paths.source, Some(PathBuf::from("/from/file")));
        assert_eq!(config.batch.on_existing, ExistingPolicy::Overwrite);
        assert_eq!(config.batch.concurrency, 3);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from([
            "music-retagger",
            "identify",
            "song.mp3",
            "--config",
            "/etc/retagger.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/etc/retagger.toml")));
        assert!(matches!(cli.command, Commands::Identify { .. }));
    }
}
