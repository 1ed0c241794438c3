//! # Watchpost
//!
//! Runs the guard simulation described by a TOML file.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use watchpost_sim::{Args, Scenario, SimConfig};

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("watchpost=info".parse()?))
        .init();

    info!("Watchpost starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = args.config_path();
    if args.write_default {
        SimConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let mut config = SimConfig::load_from(&path);
    config.validate();

    let mut scenario = Scenario::new(&config).context("building scenario")?;
    let report = scenario.run().context("running scenario")?;

    info!(
        "Watchpost shutdown complete ({} ticks, {} cues)",
        report.ticks, report.cues_played
    );
    Ok(())
}
