//! Logging setup on top of `tracing`.
//!
//! Events go to stderr; stdout carries reports and dry-run plans only.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the event filter for the given verbosity flags.
///
/// Precedence: `--verbose`, then `--quiet`, then `RUST_LOG`, then info.
#[must_use]
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("autotest=debug")
    } else if quiet {
        EnvFilter::new("autotest=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autotest=info"))
    }
}

/// Installs the global subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(use_color(no_color))
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Colors only on a terminal, and never with `--no-color` or `NO_COLOR`.
fn use_color(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}
