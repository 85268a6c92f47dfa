//! Replaying adapter for the `GitRepo` port.

use std::path::Path;

use serde_json::json;

use super::{replay, SharedReplayer};
use crate::error::PortError;
use crate::ports::git::GitRepo;

/// Replays recorded git queries.
pub struct ReplayingGitRepo {
    replayer: SharedReplayer,
}

impl ReplayingGitRepo {
    /// Creates a replaying repository backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl GitRepo for ReplayingGitRepo {
    fn is_dirty(&self, root: &Path) -> Result<bool, PortError> {
        replay(&self.replayer, "git", "is_dirty", &json!({ "root": root.to_string_lossy() }))
    }

    fn has_ref(&self, root: &Path, reference: &str) -> bool {
        let input = json!({ "root": root.to_string_lossy(), "reference": reference });
        replay(&self.replayer, "git", "has_ref", &input).unwrap_or(false)
    }

    fn changed_files(&self, root: &Path, base: &str) -> Result<Vec<String>, PortError> {
        let input = json!({ "root": root.to_string_lossy(), "base": base });
        replay(&self.replayer, "git", "changed_files", &input)
    }
}
