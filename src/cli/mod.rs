//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;
pub mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clientele - relational bookkeeping showcase over SQLite.
#[derive(Parser, Debug)]
#[command(name = "clientele")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed the database and walk through the query and locking showcase
    Run,

    /// Print per-day order totals for the seeded fixture
    Stats(StatsArgs),

    /// Validate configuration file
    CheckConfig,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Keep only days whose order total exceeds this floor
    #[arg(long, default_value_t = 10)]
    pub min_total: i64,
}
