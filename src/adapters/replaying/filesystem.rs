//! Replaying adapter for the `FileSystem` port.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::{replay, SharedReplayer};
use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations.
///
/// `walk_files` outputs are recorded relative to the root and joined back
/// onto the root passed in, so fixtures stay independent of where the test
/// runs.
pub struct ReplayingFileSystem {
    replayer: SharedReplayer,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let input = json!({ "path": path.to_string_lossy() });
        replay(&self.replayer, "fs", "read_to_string", &input)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let input = json!({ "path": path.to_string_lossy(), "contents": contents });
        replay::<serde_json::Value>(&self.replayer, "fs", "write", &input).map(drop)
    }

    fn exists(&self, path: &Path) -> bool {
        let input = json!({ "path": path.to_string_lossy() });
        replay(&self.replayer, "fs", "exists", &input).unwrap_or(false)
    }

    fn walk_files(&self, root: &Path, prune: &[&str]) -> Result<Vec<PathBuf>, PortError> {
        let input = json!({ "root": root.to_string_lossy(), "prune": prune });
        let relative: Vec<String> = replay(&self.replayer, "fs", "walk_files", &input)?;
        Ok(relative.iter().map(|rel| root.join(rel)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, CassetteReplayer, Interaction};
    use std::sync::{Arc, Mutex};

    fn fs_from(interactions: Vec<Interaction>) -> ReplayingFileSystem {
        let cassette = Cassette::new("fs", interactions);
        ReplayingFileSystem::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    #[test]
    fn read_to_string_serves_recorded_text_then_error() {
        let fs = fs_from(vec![
            Interaction::new("fs", "read_to_string", json!({"ok": "export const x = 1;"})),
            Interaction::new("fs", "read_to_string", json!({"err": "permission denied"})),
        ]);
        assert_eq!(fs.read_to_string(Path::new("a.ts")).unwrap(), "export const x = 1;");
        let err = fs.read_to_string(Path::new("b.ts")).unwrap_err();
        assert_eq!(err.to_string(), "permission denied");
    }

    #[test]
    fn walk_files_joins_onto_root() {
        let fs = fs_from(vec![Interaction::new(
            "fs",
            "walk_files",
            json!({"ok": ["src/a.ts", "src/b.ts"]}),
        )]);
        let files = fs.walk_files(Path::new("/project"), &[]).unwrap();
        let expected = vec![PathBuf::from("/project/src/a.ts"), PathBuf::from("/project/src/b.ts")];
        assert_eq!(files, expected);
    }

    #[test]
    fn recorded_path_must_match() {
        let fs = fs_from(vec![
            Interaction::new("fs", "read_to_string", json!({"ok": "{}"}))
                .with_input(json!({"path": "/p/package.json"})),
            Interaction::new("fs", "read_to_string", json!({"ok": "{}"}))
                .with_input(json!({"path": "/p/yarn.lock"})),
        ]);
        assert_eq!(fs.read_to_string(Path::new("/p/package.json")).unwrap(), "{}");
        let err = fs.read_to_string(Path::new("/p/pnpm-lock.yaml")).unwrap_err();
        assert!(err.to_string().contains("input mismatch for fs::read_to_string"));
    }

    #[test]
    fn exists_is_false_when_nothing_recorded() {
        let fs = fs_from(vec![]);
        assert!(!fs.exists(Path::new("package.json")));
    }
}
