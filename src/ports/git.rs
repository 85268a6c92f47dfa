//! Git repository port for version-control queries.

use std::path::Path;

use crate::error::PortError;

/// Provides read access to a git repository rooted at (or containing) a path.
pub trait GitRepo: Send + Sync {
    /// Returns `true` when the working tree has uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not inside a repository.
    fn is_dirty(&self, root: &Path) -> Result<bool, PortError>;

    /// Returns `true` when `reference` names an existing commit.
    fn has_ref(&self, root: &Path, reference: &str) -> bool;

    /// Lists paths changed between the merge base of `base` and `HEAD`,
    /// relative to the repository top level.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be computed.
    fn changed_files(&self, root: &Path, base: &str) -> Result<Vec<String>, PortError>;
}
