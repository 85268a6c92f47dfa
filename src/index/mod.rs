//! Project-wide index: every eligible source file with its exports and imports.
//!
//! Built once, then frozen. Workers share it through an `Arc` and only read.

mod resolve;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

pub use resolve::{FileContext, SimilarFile, RESOLUTION_SUFFIXES};

use crate::error::{Error, Result};
use crate::model::SourceFile;
use crate::ports::FileSystem;
use crate::scan::{is_eligible, relative_path, PRUNED_DIRS};

/// Summary counts over an index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexStats {
    /// Number of indexed files.
    pub files_indexed: usize,
    /// Exported symbols across all files.
    pub total_exports: usize,
    /// Import targets across all files, duplicates included.
    pub total_dependencies: usize,
    /// `total_exports / files_indexed`, or 0 for an empty index.
    pub avg_exports_per_file: f64,
}

/// Read-only map from root-relative path to parsed source file.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    root: PathBuf,
    files: BTreeMap<String, SourceFile>,
    ready: bool,
}

impl ProjectIndex {
    /// An index that was never built. Every query on it returns nothing.
    #[must_use]
    pub fn unbuilt() -> Self {
        Self::default()
    }

    /// Walks `root` and parses every eligible file.
    ///
    /// Test files are indexed out; files that cannot be read are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] only when `root` itself cannot be walked.
    pub fn build(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let paths = fs
            .walk_files(root, PRUNED_DIRS)
            .map_err(|source| Error::Io {
                path: root.to_path_buf(),
                source,
            })?;

        let mut files = BTreeMap::new();
        for path in paths {
            let Some(rel) = relative_path(root, &path).filter(|rel| is_eligible(rel)) else {
                continue;
            };
            match fs.read_to_string(&path) {
                Ok(text) => {
                    files.insert(rel.clone(), SourceFile::parse(rel, text));
                }
                Err(e) => warn!(path = %rel, error = %e, "skipping unreadable file"),
            }
        }

        let index = Self::from_files(root, files.into_values());
        let stats = index.stats();
        info!(
            files = stats.files_indexed,
            exports = stats.total_exports,
            dependencies = stats.total_dependencies,
            "project indexed"
        );
        Ok(index)
    }

    /// Builds a ready index from already-parsed files.
    #[must_use]
    pub fn from_files(root: &Path, files: impl IntoIterator<Item = SourceFile>) -> Self {
        let files = files.into_iter().map(|file| (file.path.clone(), file)).collect();
        Self {
            root: root.to_path_buf(),
            files,
            ready: true,
        }
    }

    /// Whether indexing completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Root the paths are relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Looks up a file by root-relative path.
    #[must_use]
    pub fn get(&self, rel_path: &str) -> Option<&SourceFile> {
        if !self.ready {
            return None;
        }
        self.files.get(rel_path)
    }

    /// Whether `rel_path` is indexed.
    #[must_use]
    pub fn contains(&self, rel_path: &str) -> bool {
        self.get(rel_path).is_some()
    }

    /// All indexed files in path order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values().filter(|_| self.ready)
    }

    /// Summary counts. All zero before indexing.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let files_indexed = self.files().count();
        let total_exports = self.files().map(|f| f.symbols.len()).sum();
        let total_dependencies = self.files().map(|f| f.imports.len()).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg_exports_per_file =
            if files_indexed == 0 { 0.0 } else { total_exports as f64 / files_indexed as f64 };
        debug!(files_indexed, total_exports, "computed index stats");
        IndexStats {
            files_indexed,
            total_exports,
            total_dependencies,
            avg_exports_per_file,
        }
    }
}
