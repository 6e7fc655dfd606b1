//! Command-line interface definition and parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Hotel demand simulator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "HDSIM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a run and write it as a snapshot.
    Generate(GenerateArgs),
    /// Play a snapshot through the horizon, writing reports and the updated snapshot.
    Run(RunArgs),
    /// Show how far a snapshot has progressed.
    Status(SnapshotArgs),
    /// Print a snapshot's statistics as JSON.
    Stats(SnapshotArgs),
}

/// Overrides for the `[generation]` and `[run]` config sections.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Snapshot file to write.
    #[arg(short, long, default_value = "run.json")]
    pub out: PathBuf,

    #[arg(long)]
    pub users: Option<u32>,

    /// Share of users drawn as casual travellers, in `[0, 1]`.
    #[arg(long)]
    pub casual: Option<f64>,

    /// Rooms per stay night.
    #[arg(long)]
    pub capacity: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Snapshot to play.
    #[arg(short, long, default_value = "run.json")]
    pub snapshot: PathBuf,

    /// Where to write the played snapshot; defaults to `--snapshot`.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Report directory; overrides `reports.dir`.
    #[arg(long)]
    pub reports: Option<PathBuf>,

    /// Play at most this many days.
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[arg(short, long, default_value = "run.json")]
    pub snapshot: PathBuf,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
