//! Local test synthesis: scenarios per symbol, then a rendered test file.

pub mod render;
pub mod scenario;

pub use render::{render, Mode, RenderRequest};
pub use scenario::{scenarios_for, synthesize, Expectation, SampleValue, Scenario, ScenarioKind};

use crate::error::UnitError;
use crate::model::{Framework, SourceFile};

/// Renders the test file for an already-parsed source.
///
/// # Errors
///
/// Returns [`UnitError::NoExports`] when the file exports nothing.
pub fn synthesize_file(
    file: &SourceFile,
    framework: Framework,
    related: &[&str],
    mode: Mode,
) -> Result<String, UnitError> {
    if file.symbols.is_empty() {
        return Err(UnitError::NoExports(file.path.clone()));
    }
    let scenarios = synthesize(&file.symbols);
    Ok(render(&RenderRequest {
        source_path: &file.path,
        framework,
        symbols: &file.symbols,
        scenarios: &scenarios,
        related,
        mode,
    }))
}
