//! Candidate discovery: which source files need a generated test, and where
//! that test goes.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::Framework;
use crate::ports::{FileSystem, GitRepo};

/// Directory names never descended into.
pub const PRUNED_DIRS: &[&str] = &["node_modules", ".git", "build", "dist"];

/// Extensions of files that can hold testable source.
pub const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx"];

/// Sibling files that count as an existing test for a source file.
pub const TEST_SUFFIXES: &[&str] = &[".test.ts", ".test.tsx", ".spec.ts", ".spec.tsx"];

/// Upstream references tried, in order, when no base is configured.
pub const DEFAULT_UPSTREAMS: &[&str] = &["origin/main", "origin/master"];

/// Whether a `/`-separated relative path names a source file worth testing.
///
/// Declaration files, test files themselves, and anything under a pruned
/// directory are not.
#[must_use]
pub fn is_eligible(rel_path: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| rel_path.ends_with(ext))
        && !rel_path.ends_with(".d.ts")
        && !rel_path.contains(".test.")
        && !rel_path.contains(".spec.")
        && !rel_path.split('/').any(|segment| PRUNED_DIRS.contains(&segment))
}

/// `path` relative to `root`, `/`-separated. `None` if it is not below `root`.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Whether any conventional test file already sits next to `source`.
pub fn has_test(fs: &dyn FileSystem, source: &Path) -> bool {
    let stem = source.with_extension("");
    let stem = stem.as_os_str().to_string_lossy();
    TEST_SUFFIXES.iter().any(|suffix| fs.exists(Path::new(&format!("{stem}{suffix}"))))
}

/// Every eligible, untested source file under `root`, sorted.
///
/// # Errors
///
/// Returns [`Error::Io`] if `root` cannot be walked.
pub fn find_candidates(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let files = fs
        .walk_files(root, PRUNED_DIRS)
        .map_err(|source| Error::Io {
            path: root.to_path_buf(),
            source,
        })?;
    let total = files.len();

    let mut candidates: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| relative_path(root, path).is_some_and(|rel| is_eligible(&rel)))
        .filter(|path| !has_test(fs, path))
        .collect();
    candidates.sort();

    debug!(walked = total, candidates = candidates.len(), "scanned project tree");
    Ok(candidates)
}

/// Like [`find_candidates`], restricted to files changed against upstream.
///
/// Changed paths are taken relative to `root`; deleted files are dropped.
///
/// # Errors
///
/// Returns [`Error::Git`] if no upstream can be resolved or the diff fails.
pub fn changed_candidates(
    fs: &dyn FileSystem,
    git: &dyn GitRepo,
    root: &Path,
    base: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let upstream = resolve_upstream(git, root, base)?;
    let changed = git.changed_files(root, &upstream).map_err(|e| Error::Git(e.to_string()))?;

    let mut candidates: Vec<PathBuf> = changed
        .iter()
        .filter(|rel| is_eligible(rel))
        .map(|rel| root.join(rel))
        .filter(|path| fs.exists(path) && !has_test(fs, path))
        .collect();
    candidates.sort();
    candidates.dedup();

    info!(
        upstream = %upstream,
        changed = changed.len(),
        candidates = candidates.len(),
        "change-scoped scan"
    );
    Ok(candidates)
}

/// Picks the reference to diff against: `base` if given and present,
/// otherwise the first of [`DEFAULT_UPSTREAMS`] that exists.
///
/// # Errors
///
/// Returns [`Error::Git`] when no candidate reference exists.
pub fn resolve_upstream(git: &dyn GitRepo, root: &Path, base: Option<&str>) -> Result<String> {
    if let Some(base) = base {
        return if git.has_ref(root, base) {
            Ok(base.to_string())
        } else {
            Err(Error::Git(format!("upstream reference {base} not found")))
        };
    }
    DEFAULT_UPSTREAMS
        .iter()
        .find(|reference| git.has_ref(root, reference))
        .map(|reference| (*reference).to_string())
        .ok_or_else(|| Error::Git("failed to find origin/main or origin/master".to_string()))
}

/// Refuses to continue on a dirty working tree unless allowed.
///
/// # Errors
///
/// Returns [`Error::DirtyWorkingTree`], or [`Error::Git`] when the status
/// query itself fails.
pub fn ensure_clean(git: &dyn GitRepo, root: &Path, allow_dirty: bool) -> Result<()> {
    if allow_dirty {
        return Ok(());
    }
    if git.is_dirty(root).map_err(|e| Error::Git(e.to_string()))? {
        return Err(Error::DirtyWorkingTree);
    }
    Ok(())
}

/// Where the generated test for `source` is written.
///
/// Next to the source by default. With `out_dir`, the source's path relative
/// to `cwd` is mirrored below it.
#[must_use]
pub fn default_test_path(
    source: &Path,
    framework: Framework,
    out_dir: Option<&Path>,
    cwd: &Path,
) -> PathBuf {
    let stem = source.with_extension("");
    let file_name = format!(
        "{}{}",
        stem.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
        framework.test_suffix()
    );

    let Some(out_dir) = out_dir else {
        return stem.with_file_name(file_name);
    };
    let rel = stem.strip_prefix(cwd).unwrap_or(&stem);
    let mut mirrored = out_dir.to_path_buf();
    if let Some(parent) = rel.parent() {
        mirrored.extend(parent.components().filter(|c| matches!(c, Component::Normal(_))));
    }
    mirrored.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use crate::context::ServiceContext;
    use serde_json::json;

    #[test]
    fn eligibility_rules() {
        assert!(is_eligible("src/math.ts"));
        assert!(is_eligible("src/App.tsx"));
        assert!(!is_eligible("src/types.d.ts"));
        assert!(!is_eligible("src/math.test.ts"));
        assert!(!is_eligible("src/math.spec.tsx"));
        assert!(!is_eligible("node_modules/lib/index.ts"));
        assert!(!is_eligible("packages/a/dist/index.ts"));
        assert!(!is_eligible("src/readme.md"));
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/p");
        assert_eq!(relative_path(root, Path::new("/p/src/a.ts")).as_deref(), Some("src/a.ts"));
        assert_eq!(relative_path(root, Path::new("/q/a.ts")), None);
    }

    #[test]
    fn test_path_next_to_source() {
        let cwd = Path::new("/work");
        assert_eq!(
            default_test_path(Path::new("src/math.ts"), Framework::Vitest, None, cwd),
            PathBuf::from("src/math.spec.ts")
        );
        assert_eq!(
            default_test_path(Path::new("src/App.tsx"), Framework::Jest, None, cwd),
            PathBuf::from("src/App.test.ts")
        );
    }

    #[test]
    fn test_path_mirrored_under_out_dir() {
        let cwd = Path::new("/work");
        let path = default_test_path(
            Path::new("/work/src/util/math.ts"),
            Framework::Jest,
            Some(Path::new("/work/tests")),
            cwd,
        );
        assert_eq!(path, PathBuf::from("/work/tests/src/util/math.test.ts"));
    }

    #[test]
    fn candidates_skip_tested_and_ineligible_files() {
        let dir = tempfile::tempdir().unwrap();
        for rel in ["src/a.ts", "src/b.ts", "src/b.spec.ts", "src/c.d.ts", "dist/d.ts"] {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "export const x = 1;").unwrap();
        }
        let ctx = ServiceContext::live(crate::config::AssistMode::Off, "auggie");

        let found = find_candidates(ctx.fs.as_ref(), dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("src/a.ts")]);
    }

    #[test]
    fn upstream_falls_back_to_master() {
        let cassette = Cassette::new(
            "upstream",
            vec![
                Interaction::new("git", "has_ref", json!(false)),
                Interaction::new("git", "has_ref", json!(true)),
            ],
        );
        let ctx = ServiceContext::replaying(&cassette);
        let upstream = resolve_upstream(ctx.git.as_ref(), Path::new("."), None).unwrap();
        assert_eq!(upstream, "origin/master");
    }

    #[test]
    fn missing_explicit_base_is_an_error() {
        let cassette =
            Cassette::new("base", vec![Interaction::new("git", "has_ref", json!(false))]);
        let ctx = ServiceContext::replaying(&cassette);
        let err =
            resolve_upstream(ctx.git.as_ref(), Path::new("."), Some("origin/dev")).unwrap_err();
        assert!(err.to_string().contains("origin/dev"));
    }

    #[test]
    fn changed_candidates_filter_and_join() {
        let cassette = Cassette::new(
            "changed",
            vec![
                Interaction::new("git", "has_ref", json!(true)),
                Interaction::new(
                    "git",
                    "changed_files",
                    json!({"ok": ["src/a.ts", "README.md", "src/a.test.ts", "src/gone.ts"]}),
                ),
                // src/a.ts exists and has no sibling test.
                Interaction::new("fs", "exists", json!(true)),
                Interaction::new("fs", "exists", json!(false)),
                Interaction::new("fs", "exists", json!(false)),
                Interaction::new("fs", "exists", json!(false)),
                Interaction::new("fs", "exists", json!(false)),
                // src/gone.ts was deleted.
                Interaction::new("fs", "exists", json!(false)),
            ],
        );
        let ctx = ServiceContext::replaying(&cassette);
        let root = Path::new("/repo");
        let found = changed_candidates(ctx.fs.as_ref(), ctx.git.as_ref(), root, None).unwrap();
        assert_eq!(found, vec![PathBuf::from("/repo/src/a.ts")]);
    }

    #[test]
    fn dirty_tree_is_refused_unless_allowed() {
        let cassette =
            Cassette::new("dirty", vec![Interaction::new("git", "is_dirty", json!(true))]);
        let ctx = ServiceContext::replaying(&cassette);
        assert!(matches!(
            ensure_clean(ctx.git.as_ref(), Path::new("."), false),
            Err(Error::DirtyWorkingTree)
        ));
        assert!(ensure_clean(ctx.git.as_ref(), Path::new("."), true).is_ok());
    }
}
