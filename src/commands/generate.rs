//! `autotest generate` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::GenerateArgs;
use crate::config::{AssistMode, FileConfig, RunConfig};
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::generate::{AssistedGenerator, LocalGenerator, TestGenerator};
use crate::index::ProjectIndex;
use crate::model::Framework;
use crate::pipeline::{run_pipeline, PipelineOptions, PlannedUnit, RunReport};
use crate::runner;
use crate::scan;

/// Extra unit budget on top of the assistant timeout, so the local fallback
/// still has time to run.
const FALLBACK_GRACE: Duration = Duration::from_secs(5);

/// Execute the `generate` command against the live system.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the tree is dirty, no
/// framework can be determined, every unit fails, or coverage is too low.
pub fn run(args: &GenerateArgs) -> Result<()> {
    let bootstrap = ServiceContext::live(AssistMode::Off, "");
    let file = FileConfig::load(bootstrap.fs.as_ref(), &args.root)?;
    let config = RunConfig::resolve(args, file)?;
    let ctx = ServiceContext::live(config.assist, &config.assist_command);
    let cwd = std::env::current_dir()
        .map_err(|e| Error::Io {
            path: PathBuf::from("."),
            source: Box::new(e),
        })?;
    execute(&ctx, &config, &cwd).map(drop)
}

/// Runs one generation pass with the given ports and returns the report.
///
/// # Errors
///
/// See [`run`].
pub fn execute(ctx: &ServiceContext, config: &RunConfig, cwd: &Path) -> Result<RunReport> {
    let root = config.root.as_path();
    scan::ensure_clean(ctx.git.as_ref(), root, config.allow_dirty)?;

    let framework = match config.framework.fixed() {
        Some(framework) => framework,
        None => runner::detect_framework(ctx.fs.as_ref(), root)?,
    };
    info!(framework = %framework, root = %root.display(), "starting generation");

    let candidates = if config.changed_only {
        scan::changed_candidates(ctx.fs.as_ref(), ctx.git.as_ref(), root, config.base.as_deref())?
    } else {
        scan::find_candidates(ctx.fs.as_ref(), root)?
    };
    if candidates.is_empty() {
        println!("No files need tests.");
        return Ok(RunReport::default());
    }
    println!("Found {} file(s) without tests", candidates.len());

    let units = plan_units(candidates, root, framework, config.out_dir.as_deref(), cwd);
    let (generator, unit_timeout) = choose_generator(ctx, config)?;
    let options = PipelineOptions {
        max_workers: config.max_workers,
        unit_timeout,
        framework,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Command {
            command: "tokio runtime".into(),
            message: e.to_string(),
        })?;
    let results = runtime.block_on(run_pipeline(units, Arc::clone(&ctx.fs), generator, options));

    let report = RunReport::new(results);
    print!("{}", report.summary());
    report.ensure_any_success()?;

    if config.dry_run {
        print!("\n{}", report.plan());
        return Ok(report);
    }

    let written = report.write_all(ctx.fs.as_ref());
    for path in &written {
        println!("wrote {}", path.display());
    }
    println!("\nWrote {} test file(s)", written.len());

    if config.run_tests && !written.is_empty() {
        let paths: Vec<PathBuf> =
            report.succeeded().map(|(result, _)| result.test_path.clone()).collect();
        if let Err(e) = runner::run_tests(ctx.shell.as_ref(), &paths, framework, root) {
            warn!(error = %e, "test run failed");
        }
    }

    if let Some(minimum) = config.min_coverage.filter(|min| *min > 0.0) {
        check_coverage(ctx, root, framework, minimum)?;
    }
    Ok(report)
}

fn plan_units(
    candidates: Vec<PathBuf>,
    root: &Path,
    framework: Framework,
    out_dir: Option<&Path>,
    cwd: &Path,
) -> Vec<PlannedUnit> {
    candidates
        .into_iter()
        .map(|source| PlannedUnit {
            rel_path: scan::relative_path(root, &source)
                .unwrap_or_else(|| source.display().to_string()),
            test_path: scan::default_test_path(&source, framework, out_dir, cwd),
            source,
        })
        .collect()
}

fn choose_generator(
    ctx: &ServiceContext,
    config: &RunConfig,
) -> Result<(Arc<dyn TestGenerator>, Duration)> {
    let local = if config.context {
        LocalGenerator::with_index(Arc::new(ProjectIndex::build(ctx.fs.as_ref(), &config.root)?))
    } else {
        LocalGenerator::standalone()
    };

    match (&ctx.llm, config.assist) {
        (Some(llm), AssistMode::Command | AssistMode::Api) => {
            let assisted = AssistedGenerator::new(
                Arc::clone(llm),
                local,
                config.model.clone(),
                config.timeout,
            );
            Ok((Arc::new(assisted), config.timeout + FALLBACK_GRACE))
        }
        _ => Ok((Arc::new(local), config.timeout)),
    }
}

fn check_coverage(
    ctx: &ServiceContext,
    root: &Path,
    framework: Framework,
    minimum: f64,
) -> Result<()> {
    println!("\nChecking coverage (minimum: {minimum:.1}%)");
    match runner::coverage(ctx.fs.as_ref(), ctx.shell.as_ref(), root, framework) {
        Ok(actual) if actual < minimum => Err(Error::CoverageBelowMinimum { actual, minimum }),
        Ok(actual) => {
            println!("Coverage: {actual:.1}%");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "failed to measure coverage");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use serde_json::json;

    fn config(extra: &[&str]) -> RunConfig {
        let mut argv = vec!["autotest", "generate", "--root", "/p", "--max-workers", "2"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Generate(args) => RunConfig::resolve(&args, FileConfig::default()).unwrap(),
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn ctx(interactions: Vec<Interaction>) -> ServiceContext {
        ServiceContext::replaying(&Cassette::new("generate", interactions))
    }

    fn fs(method: &str, output: serde_json::Value) -> Interaction {
        Interaction::new("fs", method, output)
    }

    fn shell(output: serde_json::Value) -> Interaction {
        Interaction::new("shell", "run", output)
    }

    #[test]
    fn dirty_tree_stops_before_scanning() {
        let ctx = ctx(vec![Interaction::new("git", "is_dirty", json!({"ok": true}))]);
        let err = execute(&ctx, &config(&["--fw", "jest"]), Path::new("/p")).unwrap_err();
        assert!(matches!(err, Error::DirtyWorkingTree));
    }

    #[test]
    fn nothing_to_do() {
        let ctx = ctx(vec![
            Interaction::new("git", "is_dirty", json!({"ok": false})),
            fs("walk_files", json!({"ok": ["README.md", "src/a.test.ts"]})),
        ]);
        let report = execute(&ctx, &config(&["--fw", "jest"]), Path::new("/p")).unwrap();
        assert!(report.results().is_empty());
    }

    #[test]
    fn dry_run_plans_without_writing() {
        let ctx = ctx(vec![
            fs("read_to_string", json!({"ok": r#"{"devDependencies":{"vitest":"^1"}}"#})),
            fs("walk_files", json!({"ok": ["src/math.ts"]})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("read_to_string", json!({"ok": "export function add(a: number, b: number) {}"})),
        ]);
        let config = config(&["--allow-dirty", "--dry-run"]);
        let report = execute(&ctx, &config, Path::new("/p")).unwrap();

        let (result, text) = report.succeeded().next().unwrap();
        assert_eq!(result.test_path, PathBuf::from("/p/src/math.spec.ts"));
        assert!(text.contains("import { add } from '../src/math';"));
    }

    #[test]
    fn all_units_failing_is_fatal() {
        let ctx = ctx(vec![
            fs("walk_files", json!({"ok": ["a.ts"]})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("read_to_string", json!({"ok": "const internal = 1;"})),
        ]);
        let config = config(&["--allow-dirty", "--fw", "jest"]);
        let err = execute(&ctx, &config, Path::new("/p")).unwrap_err();
        assert!(matches!(err, Error::AllFailed(1)));
    }

    #[test]
    fn writes_runs_tests_and_checks_coverage() {
        let ctx = ctx(vec![
            fs("walk_files", json!({"ok": ["lib/util.ts"]})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("exists", json!({"ok": false})),
            fs("read_to_string", json!({"ok": "export class Util {}"})),
            fs("write", json!({"ok": null})),
            shell(json!({"ok": {"exit_code": 1, "stdout": "1 failed"}})),
            fs("read_to_string", json!({"ok": "{}"})),
            shell(json!({"ok": {"exit_code": 0, "stdout": "Statements   : 40% ( 2/5 )"}})),
        ]);
        let err = execute(
            &ctx,
            &config(&["--allow-dirty", "--fw", "jest", "--min-coverage", "80"]),
            Path::new("/p"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::CoverageBelowMinimum { actual, minimum } if actual == 40.0 && minimum == 80.0
        ));
    }

    #[test]
    fn out_dir_mirrors_source_layout() {
        let units = plan_units(
            vec![PathBuf::from("/work/app/src/a.ts")],
            Path::new("/work/app"),
            Framework::Jest,
            Some(Path::new("/tests")),
            Path::new("/work"),
        );
        assert_eq!(units[0].rel_path, "src/a.ts");
        assert_eq!(units[0].test_path, PathBuf::from("/tests/app/src/a.test.ts"));
    }

    #[test]
    fn assisted_generator_gets_grace_period() {
        let ctx = ctx(vec![]);
        let assisted = config(&["--assist", "api", "--timeout-secs", "10"]);
        let (generator, timeout) = choose_generator(&ctx, &assisted).unwrap();
        assert_eq!(generator.name(), "assisted");
        assert_eq!(timeout, Duration::from_secs(15));

        let local = config(&["--timeout-secs", "10"]);
        let (generator, timeout) = choose_generator(&ctx, &local).unwrap();
        assert_eq!(generator.name(), "local");
        assert_eq!(timeout, Duration::from_secs(10));
    }
}
