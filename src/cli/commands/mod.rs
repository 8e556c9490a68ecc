//! Command implementations.

mod identify;
mod run;
mod tools;

use std::path::Path;

use crate::config::{self, Config};

pub use identify::cmd_identify;
pub use run::cmd_run;
pub use tools::{cmd_check_tools, cmd_init_config};

/// Load the config file and validate it after `overrides` are applied.
fn load_config(path: Option<&Path>, overrides: impl FnOnce(&mut Config)) -> anyhow::Result<Config> {
    let mut config = config::load(path)?;
    overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Print installation instructions for fpcalc
pub(crate) fn print_fpcalc_install_instructions() {
    eprintln!("fpcalc (Chromaprint) is required for AcoustID recognition.");
    eprintln!();
    eprintln!("Install it:");
    eprintln!("  Windows: winget install AcoustID.Chromaprint");
    eprintln!("  macOS:   brew install chromaprint");
    eprintln!("  Linux:   apt install libchromaprint-tools");
}
