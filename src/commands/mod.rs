//! Command dispatch and handlers.

pub mod detect;
pub mod generate;
pub mod index;

use crate::cli::Command;
use crate::config::AssistMode;
use crate::context::ServiceContext;
use crate::error::Result;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns the handler's error.
pub fn dispatch(command: &Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate::run(args),
        Command::Index(args) => index::run(&ServiceContext::live(AssistMode::Off, ""), args),
        Command::Detect(args) => detect::run(&ServiceContext::live(AssistMode::Off, ""), args),
    }
}
