// src/cli.rs

//! CLI argument parsing for the `flowdag` demo binary.

use clap::Parser;

use crate::logging::LogLevel;
use crate::types::GraphShape;

/// Command-line arguments for `flowdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flowdag",
    version,
    about = "Run synthetic task DAGs on a fixed worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML). Without it, `Flowdag.toml` in the
    /// current directory is used if present, else defaults plus
    /// `FLOWDAG_WORKERS`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Number of worker threads; overrides the config file.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Shape of the graph built for every round.
    #[arg(long, value_enum, default_value_t = GraphShape::Fan)]
    pub shape: GraphShape,

    /// Width of the shape (chain length, fan width, diamond layer size).
    #[arg(long, default_value_t = 8)]
    pub width: usize,

    /// How many graphs to dispatch; they run concurrently on the pool.
    #[arg(long, default_value_t = 4)]
    pub rounds: usize,

    /// Simulated work per task, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 5)]
    pub work_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLOWDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the configuration and print the plan, but run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
