//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{AssistMode, FrameworkChoice};

/// Top-level CLI parser for `autotest`.
#[derive(Debug, Parser)]
#[command(
    name = "autotest",
    version,
    about = "Scaffold unit tests for untested TypeScript modules"
)]
pub struct Cli {
    /// Debug-level logging.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Errors only.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate test files for source files that have none.
    Generate(GenerateArgs),
    /// Build the project index and print a summary.
    Index(IndexArgs),
    /// Print the detected test framework.
    Detect(DetectArgs),
}

/// Flags for `generate`. Unset optional values fall back to `.autotest.yaml`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Project root.
    #[arg(long)]
    pub root: PathBuf,

    /// Test framework.
    #[arg(long, value_enum)]
    pub fw: Option<FrameworkChoice>,

    /// Write tests under this directory instead of next to their sources.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the plan without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Only consider files changed against the upstream branch.
    #[arg(long)]
    pub changed_only: bool,

    /// Upstream reference for --changed-only (default: origin/main, then origin/master).
    #[arg(long, requires = "changed_only")]
    pub base: Option<String>,

    /// Maximum concurrent generations (default: available parallelism).
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Fail when coverage after the run is below this percentage.
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Run even with uncommitted changes.
    #[arg(long)]
    pub allow_dirty: bool,

    /// Per-file generation timeout in seconds (default: 120).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Index the whole project and use it for richer generation.
    #[arg(long)]
    pub context: bool,

    /// Enhanced generation backend.
    #[arg(long, value_enum)]
    pub assist: Option<AssistMode>,

    /// Assistant program for --assist command (default: auggie).
    #[arg(long)]
    pub assist_command: Option<String>,

    /// Model for --assist api.
    #[arg(long)]
    pub model: Option<String>,

    /// Do not run the test suite after writing.
    #[arg(long)]
    pub no_run: bool,
}

/// Flags for `index`.
#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// Project root.
    #[arg(long)]
    pub root: PathBuf,

    /// Also print the context of this file (path relative to the root).
    #[arg(long)]
    pub file: Option<String>,
}

/// Flags for `detect`.
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Project root.
    #[arg(long)]
    pub root: PathBuf,
}
