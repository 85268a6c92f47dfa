//! Aggregated pipeline results: summary, dry-run plan and file writing.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use super::TestResult;
use crate::error::{Error, Result, UnitError};
use crate::ports::FileSystem;

/// All results of one run, sorted by source path.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: Vec<TestResult>,
}

impl RunReport {
    /// Sorts `results` by source path.
    #[must_use]
    pub fn new(mut results: Vec<TestResult>) -> Self {
        results.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        Self { results }
    }

    /// Every result, in source-path order.
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Successful results as `(result, text)`.
    pub fn succeeded(&self) -> impl Iterator<Item = (&TestResult, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_deref().ok().map(|text| (r, text)))
    }

    /// Failures as `(source, reason)`.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &UnitError)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.source_path.as_path(), e)))
    }

    /// Fails only when there were units and none succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllFailed`] with the unit count.
    pub fn ensure_any_success(&self) -> Result<()> {
        if !self.results.is_empty() && self.succeeded().next().is_none() {
            return Err(Error::AllFailed(self.results.len()));
        }
        Ok(())
    }

    /// One line per failure, then the counts.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (path, reason) in self.failed() {
            let _ = writeln!(out, "failed: {}: {reason}", path.display());
        }
        let _ = writeln!(
            out,
            "Generated {} test(s), {} failed",
            self.succeeded().count(),
            self.failed().count()
        );
        out
    }

    /// The dry-run plan: source, destination and line count per success.
    #[must_use]
    pub fn plan(&self) -> String {
        let mut out = String::from("=== DRY RUN: Test Generation Plan ===\n");
        for (result, text) in self.succeeded() {
            let _ = write!(
                out,
                "\nSource: {}\nTest:   {}\nLines:  {}\n",
                result.source_path.display(),
                result.test_path.display(),
                text.lines().count()
            );
        }
        out.push_str("\n(No files written in dry-run mode)\n");
        out
    }

    /// Writes every successful result, creating parent directories.
    ///
    /// A failed write is logged and skipped; the paths actually written are
    /// returned in order.
    pub fn write_all(&self, fs: &dyn FileSystem) -> Vec<PathBuf> {
        let mut written = Vec::new();
        for (result, text) in self.succeeded() {
            match fs.write(&result.test_path, text) {
                Ok(()) => written.push(result.test_path.clone()),
                Err(e) => error!(
                    path = %result.test_path.display(),
                    error = %e,
                    "failed to write test file"
                ),
            }
        }
        if written.len() < self.succeeded().count() {
            warn!(written = written.len(), "some test files were not written");
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use crate::context::ServiceContext;
    use serde_json::json;

    fn ok(source: &str, text: &str) -> TestResult {
        TestResult {
            source_path: source.into(),
            test_path: source.replace(".ts", ".spec.ts").into(),
            outcome: Ok(text.into()),
        }
    }

    fn failed(source: &str, err: UnitError) -> TestResult {
        TestResult {
            source_path: source.into(),
            test_path: source.replace(".ts", ".spec.ts").into(),
            outcome: Err(err),
        }
    }

    #[test]
    fn sorted_by_source_path() {
        let report = RunReport::new(vec![
            ok("src/z.ts", "a\n"),
            ok("src/a.ts", "b\n"),
            ok("lib/m.ts", "c\n"),
        ]);
        let order: Vec<_> = report.results().iter().map(|r| r.source_path.clone()).collect();
        let expected: Vec<PathBuf> = ["lib/m.ts", "src/a.ts", "src/z.ts"].map(PathBuf::from).into();
        assert_eq!(order, expected);
    }

    #[test]
    fn all_failed_only_when_nothing_succeeded() {
        let none = RunReport::new(vec![failed("a.ts", UnitError::NoExports("a.ts".into()))]);
        assert!(matches!(none.ensure_any_success(), Err(Error::AllFailed(1))));

        let some = RunReport::new(vec![failed("a.ts", UnitError::Timeout(1)), ok("b.ts", "x")]);
        assert!(some.ensure_any_success().is_ok());

        assert!(RunReport::new(vec![]).ensure_any_success().is_ok());
    }

    #[test]
    fn summary_lists_failures_then_counts() {
        let report = RunReport::new(vec![
            ok("b.ts", "x"),
            failed("a.ts", UnitError::NoExports("a.ts".into())),
        ]);
        assert_eq!(
            report.summary(),
            "failed: a.ts: no exported symbols found in a.ts\nGenerated 1 test(s), 1 failed\n"
        );
    }

    #[test]
    fn plan_is_deterministic() {
        let report = RunReport::new(vec![ok("src/b.ts", "1\n2\n3\n"), ok("src/a.ts", "1\n")]);
        assert_eq!(
            report.plan(),
            "=== DRY RUN: Test Generation Plan ===\n\
             \nSource: src/a.ts\nTest:   src/a.spec.ts\nLines:  1\n\
             \nSource: src/b.ts\nTest:   src/b.spec.ts\nLines:  3\n\
             \n(No files written in dry-run mode)\n"
        );
    }

    #[test]
    fn write_all_skips_failed_writes() {
        let ctx = ServiceContext::replaying(&Cassette::new(
            "writes",
            vec![
                Interaction::new("fs", "write", json!({"ok": null})),
                Interaction::new("fs", "write", json!({"err": "read-only filesystem"})),
            ],
        ));
        let report = RunReport::new(vec![
            ok("a.ts", "x"),
            ok("b.ts", "y"),
            failed("c.ts", UnitError::Read("gone".into())),
        ]);
        assert_eq!(report.write_all(ctx.fs.as_ref()), vec![PathBuf::from("a.spec.ts")]);
    }
}
