//! Replaying adapter for the `ShellExecutor` port.

use std::path::Path;

use serde_json::json;

use super::{replay, SharedReplayer};
use crate::error::PortError;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Replays recorded command results.
pub struct ReplayingShellExecutor {
    replayer: SharedReplayer,
}

impl ReplayingShellExecutor {
    /// Creates a replaying executor backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ShellOutput, PortError> {
        let input = json!({ "program": program, "args": args, "cwd": cwd.to_string_lossy() });
        replay(&self.replayer, "shell", "run", &input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, CassetteReplayer, Interaction};
    use std::sync::{Arc, Mutex};

    #[test]
    fn serves_recorded_exit_codes() {
        let cassette = Cassette::new(
            "shell",
            vec![
                Interaction::new(
                    "shell",
                    "run",
                    json!({"ok": {"exit_code": 0, "stdout": "ok\n", "stderr": ""}}),
                )
                .with_input(json!({"program": "npm", "args": ["run", "test"]})),
                Interaction::new("shell", "run", json!({"err": "npm: not found"})),
            ],
        );
        let shell =
            ReplayingShellExecutor::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));

        let out = shell.run("npm", &["run".into(), "test".into()], Path::new(".")).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "ok\n");
        assert!(shell.run("npm", &[], Path::new(".")).is_err());
    }
}
