//! `hdsim`: command-line driver for the hotel demand simulator.
//!
//! ```text
//! hdsim generate --users 500 --seed 7 --out run.json
//! hdsim run --snapshot run.json --reports ./reports
//! hdsim status --snapshot run.json
//! hdsim stats --snapshot run.json
//! ```

pub mod commands;
pub mod pricing;

mod cli;
pub use cli::{Cli, Commands, GenerateArgs, RunArgs, SnapshotArgs};

mod config;
pub use config::{AppConfig, GenerationConfig, PricingConfig, ReportsConfig, SourceConfig};

#[cfg(test)]
mod tests;
