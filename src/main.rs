//! Music Retagger - recognize audio files and write canonically tagged copies.
//!
//! Each input file is identified through AcoustID and/or AudD, resolved
//! against MusicBrainz and the Cover Art Archive, and copied to
//! `{target}/{Artist}/{Artist} - {Title}.mp3` with fresh ID3v2 tags.

pub mod cli;
pub mod config;
pub mod cover;
pub mod enrichment;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod organizer;
pub mod pipeline;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();
    cli::run_command(&args)
}
