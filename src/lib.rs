//! Core library for the `autotest` CLI: finds TypeScript modules without
//! tests and scaffolds Jest or Vitest test files for them.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod generate;
pub mod index;
pub mod logger;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod runner;
pub mod scan;
pub mod synth;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// Logging is initialized from the global flags before dispatch.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);
    commands::dispatch(&cli.command).map_err(|err| format!("error: {err}"))
}
