//! Shell executor port for running external commands.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// The output of a command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// The exit code of the process; `-1` when killed by a signal.
    pub exit_code: i32,
    /// The captured standard output.
    #[serde(default)]
    pub stdout: String,
    /// The captured standard error.
    #[serde(default)]
    pub stderr: String,
}

impl ShellOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output followed by standard error.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Executes external programs.
///
/// Abstracting execution allows deterministic replay by serving recorded
/// outputs during cassette playback.
pub trait ShellExecutor: Send + Sync {
    /// Runs `program` with `args` in `cwd` and captures its output.
    ///
    /// A non-zero exit is not an error; inspect [`ShellOutput::exit_code`].
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ShellOutput, PortError>;
}
