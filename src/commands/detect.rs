//! `autotest detect` command.

use crate::cli::DetectArgs;
use crate::context::ServiceContext;
use crate::error::Result;
use crate::runner::detect_framework;

/// Execute the `detect` command: print `jest` or `vitest`.
///
/// # Errors
///
/// Returns an error if neither framework can be found.
pub fn run(ctx: &ServiceContext, args: &DetectArgs) -> Result<()> {
    let framework = detect_framework(ctx.fs.as_ref(), &args.root)?;
    println!("{framework}");
    Ok(())
}
