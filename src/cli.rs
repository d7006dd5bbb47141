//! Argument parsing: two positional directories, two tunables with
//! environment-variable fallbacks, and an optional methods-table export.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::graph::relax::DEFAULT_MAX_ITERATIONS;

const DEFAULT_TOP_N: usize = 10;

/// Console report format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text, the always-on console report
    #[default]
    Human,
    /// Compact JSON for programmatic consumption
    Json,
}

/// Ranks call edges present in a supergraph but missing from a subgraph,
/// by how likely they represent genuinely reachable behavior.
#[derive(Parser, Debug, Clone)]
#[command(name = "diff-tool")]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the larger analysis's three CSV tables
    pub super_dir: PathBuf,

    /// Directory holding the smaller analysis's three CSV tables
    pub sub_dir: PathBuf,

    /// Cap on relaxation iterations
    #[arg(default_value_t = DEFAULT_MAX_ITERATIONS, env = "DIFF_TOOL_MAX_ITERATIONS")]
    pub max_iterations: usize,

    /// Number of ranked edges to print; 0 suppresses ranking output
    #[arg(default_value_t = DEFAULT_TOP_N, env = "DIFF_TOOL_TOP_N")]
    pub top_n: usize,

    /// Write the supergraph's method table (with a PresentInOther column) here
    #[arg(long)]
    pub methods_csv: Option<PathBuf>,

    /// Console report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,
}
