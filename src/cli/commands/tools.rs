//! Environment checks and config file creation.

use std::path::Path;
use std::process::ExitCode;

use super::{load_config, print_fpcalc_install_instructions};
use crate::cli::CredentialArgs;
use crate::config::{self, Config, ConfigError};
use crate::enrichment::fingerprint::Fingerprinter;

/// Check if fingerprinting tools are installed and credentials configured
pub fn cmd_check_tools(
    config_path: Option<&Path>,
    credentials: &CredentialArgs,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path, |config| credentials.apply(config))?;

    println!("Checking recognition tools...\n");

    let fpcalc = Fingerprinter::locate();
    match fpcalc.as_ref().and_then(|f| f.version().map(|v| (f, v))) {
        Some((fingerprinter, version)) => {
            println!("✓ fpcalc: {} ({})", version, fingerprinter.program().display())
        }
        None => {
            println!("✗ fpcalc: NOT FOUND");
            print_fpcalc_install_instructions();
        }
    }

    println!();
    println!("Credentials:");
    let acoustid = is_set(&config.credentials.acoustid_api_key);
    let audd = is_set(&config.credentials.audd_api_token);
    if acoustid {
        println!("✓ AcoustID API key: set");
    } else {
        println!("✗ AcoustID API key: not set");
        println!("  Get one at: https://acoustid.org/new-application");
    }
    if audd {
        println!("✓ AudD API token: set");
    } else {
        println!("✗ AudD API token: not set");
        println!("  Get one at: https://dashboard.audd.io");
    }

    println!();
    println!("Provider order: {}", config.recognition.providers.join(", "));

    let usable = (acoustid && fpcalc.is_some()) || audd;
    if usable {
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\nNo recognition provider is usable.");
        Ok(ExitCode::FAILURE)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Write a default config file
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<ExitCode> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if path.exists() && !force {
        eprintln!("Config file already exists: {:?}", path);
        eprintln!("Use --force to replace it.");
        return Ok(ExitCode::FAILURE);
    }

    config::save(&Config::default(), &path)?;
    println!("✓ Wrote default config to {:?}", path);
    Ok(ExitCode::SUCCESS)
}
