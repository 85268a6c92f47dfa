//! Live shell executor using `std::process::Command`.

use std::path::Path;
use std::process::Command;

use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Live executor that spawns programs directly, without a shell.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ShellOutput, PortError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| format!("failed to spawn {program}: {e}"))?;
        Ok(ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn runs_program_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = LiveShellExecutor.run("pwd", &[], dir.path()).unwrap();

        assert!(result.success());
        let printed = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(printed, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn captures_exit_code() {
        let args = vec!["-c".to_string(), "exit 42".to_string()];
        let result = LiveShellExecutor.run("sh", &args, Path::new(".")).unwrap();
        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = LiveShellExecutor.run("definitely-not-a-real-program-7f3a", &[], Path::new("."));
        assert!(err.unwrap_err().to_string().contains("failed to spawn"));
    }
}
