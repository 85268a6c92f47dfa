//! Framework detection, test execution and coverage through `npm`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::Framework;
use crate::ports::{FileSystem, ShellExecutor};
use crate::scan::relative_path;

/// Lockfiles searched when the manifest names no framework, in order.
pub const LOCKFILES: &[&str] = &["pnpm-lock.yaml", "yarn.lock", "package-lock.json"];

/// `Coverage: 85.5%`, `coverage: 70%`, `Statements   : 87.5%`.
static LEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Coverage|coverage|Statements)\s*:\s*(\d+(?:\.\d+)?)")
        .expect("leading coverage pattern is valid")
});

/// `64.2% coverage`, `51% Statements`.
static TRAILING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)%\s*(?:coverage|Statements)")
        .expect("trailing coverage pattern is valid")
});

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    scripts: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    fn declares(&self, name: &str) -> bool {
        self.dev_dependencies.contains_key(name) || self.dependencies.contains_key(name)
    }
}

fn load_manifest(fs: &dyn FileSystem, root: &Path) -> Result<PackageManifest> {
    let path = root.join("package.json");
    let text = fs
        .read_to_string(&path)
        .map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|e| Error::Parse {
        path,
        message: e.to_string(),
    })
}

/// Detects the project's test framework.
///
/// `package.json` dependencies decide first, vitest winning over jest. When
/// neither is declared, or the manifest is unusable, the lockfiles are
/// searched as text for vitest, then jest.
///
/// # Errors
///
/// Returns [`Error::FrameworkNotDetected`] when nothing names either framework.
pub fn detect_framework(fs: &dyn FileSystem, root: &Path) -> Result<Framework> {
    match load_manifest(fs, root) {
        Ok(manifest) => {
            for framework in [Framework::Vitest, Framework::Jest] {
                if manifest.declares(framework.as_str()) {
                    debug!(framework = %framework, "framework declared in package.json");
                    return Ok(framework);
                }
            }
        }
        Err(e) => warn!(error = %e, "package.json unusable, searching lockfiles"),
    }

    let lockfiles: Vec<String> = LOCKFILES
        .iter()
        .filter_map(|name| fs.read_to_string(&root.join(name)).ok())
        .collect();
    for framework in [Framework::Vitest, Framework::Jest] {
        if lockfiles.iter().any(|text| text.contains(framework.as_str())) {
            debug!(framework = %framework, "framework found in lockfile");
            return Ok(framework);
        }
    }
    Err(Error::FrameworkNotDetected)
}

fn display_arg(root: &Path, path: &Path) -> String {
    relative_path(root, path).unwrap_or_else(|| path.display().to_string())
}

fn npm(shell: &dyn ShellExecutor, args: Vec<String>, root: &Path) -> Result<String> {
    let command = format!("npm {}", args.join(" "));
    debug!(command = %command, "running");
    let output = shell
        .run("npm", &args, root)
        .map_err(|e| Error::Command {
            command: command.clone(),
            message: e.to_string(),
        })?;
    if !output.success() {
        return Err(Error::Command {
            command,
            message: format!("exit code {}", output.exit_code),
        });
    }
    Ok(output.combined())
}

/// Runs the test suite over every path in `paths` from `root`.
///
/// # Errors
///
/// Returns [`Error::Command`] when `npm` cannot be started or exits non-zero.
pub fn run_tests(
    shell: &dyn ShellExecutor,
    paths: &[PathBuf],
    framework: Framework,
    root: &Path,
) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    info!(tests = paths.len(), framework = %framework, "running generated tests");
    let mut args = vec!["run".to_string(), "test".to_string(), "--".to_string()];
    args.extend(paths.iter().map(|path| display_arg(root, path)));
    npm(shell, args, root).map(drop)
}

/// Runs a coverage-enabled test pass and returns the reported percentage.
///
/// Uses the `test:coverage` script when `package.json` defines one.
///
/// # Errors
///
/// Returns [`Error::Command`] when `npm` cannot be started or exits non-zero.
pub fn coverage(
    fs: &dyn FileSystem,
    shell: &dyn ShellExecutor,
    root: &Path,
    framework: Framework,
) -> Result<f64> {
    let has_script =
        load_manifest(fs, root).is_ok_and(|m| m.scripts.contains_key("test:coverage"));
    let args: Vec<String> = if has_script {
        vec!["run".into(), "test:coverage".into()]
    } else {
        vec!["run".into(), "test".into(), "--".into(), "--coverage".into()]
    };
    debug!(framework = %framework, has_script, "measuring coverage");
    let output = npm(shell, args, root)?;
    Ok(parse_coverage(&output))
}

/// First percentage found next to a known coverage marker; 0 when none is.
///
/// Markers followed by the number win over markers preceded by it.
#[must_use]
pub fn parse_coverage(output: &str) -> f64 {
    [&*LEADING_MARKER, &*TRAILING_MARKER]
        .iter()
        .find_map(|pattern| pattern.captures(output)?[1].parse().ok())
        .unwrap_or(0.0)
}
