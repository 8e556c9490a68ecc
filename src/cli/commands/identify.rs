//! Single-file recognition without writing.

use std::path::Path;
use std::process::ExitCode;

use tokio::runtime::Runtime;

use super::load_config;
use crate::cli::CredentialArgs;
use crate::logging;
use crate::pipeline::{Identified, Stages};

/// Recognize and resolve one file and print what would be written
pub fn cmd_identify(
    config_path: Option<&Path>,
    path: &Path,
    credentials: &CredentialArgs,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config_path, |config| credentials.apply(config))?;
    logging::init(None)?;

    if !path.is_file() {
        anyhow::bail!("Not a file: {:?}", path);
    }

    println!("Identifying: {:?}", path);
    println!();

    let rt = Runtime::new()?;
    let result = rt.block_on(async {
        let stages = Stages::from_config(&config)?;
        Ok::<_, crate::error::Error>(stages.identify(path).await)
    })?;

    match result {
        Ok(identified) => {
            print_identified(&identified);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            println!("✗ {}", failure);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_identified(identified: &Identified) {
    let meta = &identified.metadata;
    println!(
        "✓ Match found via {} (confidence: {:.0}%)",
        identified.source,
        identified.score * 100.0
    );
    println!();
    println!("  Artist: {}", meta.artist);
    println!("  Title:  {}", meta.title);
    if let Some(album) = &meta.album {
        println!("  Album:  {}", album);
    }
    if let Some(date) = &meta.release_date {
        println!("  Date:   {}", date);
    }
    if let Some(label) = &meta.label {
        println!("  Label:  {}", label);
    }
    if let Some(producer) = &meta.producer {
        println!("  Producer: {}", producer);
    }
    match &meta.cover_reference {
        Some(cover) => println!("  Cover:  {}", cover),
        None => println!("  Cover:  (none)"),
    }
}
