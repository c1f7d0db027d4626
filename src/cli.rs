//! CLI argument parsing for benchskip

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "benchskip")]
#[command(version)]
#[command(
    about = "Query declarative skip lists for benchmark operators and implementations",
    long_about = None
)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,

    /// TOML config locating per-mode skip lists
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip list to load directly (bypasses run-mode resolution)
    #[arg(
        short = 'f',
        long = "skip-file",
        value_name = "FILE",
        conflicts_with = "mode"
    )]
    pub skip_file: Option<PathBuf>,

    /// Run mode selecting skip_tests_<MODE>.yaml (e.g. h100_pytorch)
    #[arg(short = 'm', long = "mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Fail when an operator is listed more than once
    #[arg(long)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Check whether an operator (or one of its implementations) should run.
    /// Exits 0 if active, 1 if excluded.
    Check {
        /// Operator name (e.g. gemm)
        operator: String,

        /// Implementation name (e.g. triton_tma_persistent_matmul)
        implementation: Option<String>,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print every excluded operator and implementation
    List {
        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Load the skip list and report structural errors
    Validate,

    /// Print the skip list in canonical sorted form
    Fmt,
}
