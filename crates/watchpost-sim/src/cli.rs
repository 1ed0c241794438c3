//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::CONFIG_FILE;

/// Runs the guard simulation described by a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the level configuration (defaults to `watchpost.toml`)
    pub config: Option<PathBuf>,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    pub write_default: bool,
}

impl Args {
    /// Configuration path, falling back to [`CONFIG_FILE`].
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}
