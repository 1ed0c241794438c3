//! # Watchpost Sim
//!
//! Headless simulation of guards hunting an intruder.
//!
//! This crate ties together:
//! - A level implementing every guard port (bounds, walls, sight cone, hearing)
//! - TOML configuration of the level and its actors
//! - A fixed-timestep scenario runner that reports the outcome
//! - Command line arguments for the `watchpost` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod scenario;
pub mod timing;
pub mod world;

pub use cli::Args;
pub use config::{GuardSpawn, IntruderConfig, SimConfig, WallBox, CONFIG_FILE};
pub use scenario::{Scenario, ScenarioError, SimReport};
pub use timing::FixedStep;
pub use world::{Intruder, SimWorld};
