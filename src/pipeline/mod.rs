//! Bounded worker pool: one unit of read → generate per candidate.
//!
//! At most `max_workers` units hold a permit at any instant. Every unit
//! sends exactly one [`TestResult`]; a failing unit never affects the others.

pub mod report;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

pub use report::RunReport;

use crate::error::UnitError;
use crate::generate::{GenerationRequest, TestGenerator};
use crate::model::Framework;
use crate::ports::FileSystem;

/// A candidate with its destination worked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    /// Source path as handed to the filesystem.
    pub source: PathBuf,
    /// Source path relative to the project root, `/`-separated.
    pub rel_path: String,
    /// Where the generated test goes.
    pub test_path: PathBuf,
}

/// Source text read for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Source path.
    pub source: PathBuf,
    /// Text as read.
    pub text: String,
}

/// Outcome of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    /// Source path.
    pub source_path: PathBuf,
    /// Destination test path.
    pub test_path: PathBuf,
    /// Rendered test text, or why there is none.
    pub outcome: Result<String, UnitError>,
}

/// Pool settings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Concurrency bound; values below 1 are treated as 1.
    pub max_workers: usize,
    /// Budget for one unit, read included.
    pub unit_timeout: Duration,
    /// Target framework.
    pub framework: Framework,
}

/// Runs every unit under the concurrency bound and collects all results.
///
/// Results come back in completion order; [`RunReport`] sorts them.
pub async fn run_pipeline(
    units: Vec<PlannedUnit>,
    fs: Arc<dyn FileSystem>,
    generator: Arc<dyn TestGenerator>,
    options: PipelineOptions,
) -> Vec<TestResult> {
    let limit = options.max_workers.max(1);
    info!(units = units.len(), workers = limit, generator = generator.name(), "pipeline started");

    let semaphore = Arc::new(Semaphore::new(limit));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut handles = Vec::with_capacity(units.len());
    for unit in units {
        let semaphore = Arc::clone(&semaphore);
        let fs = Arc::clone(&fs);
        let generator = Arc::clone(&generator);
        let tx = tx.clone();
        let placeholder = (unit.source.clone(), unit.test_path.clone());

        let handle = tokio::spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    debug!(path = %unit.rel_path, "unit started");
                    let budget = options.unit_timeout;
                    let work = run_unit(&unit, fs, generator.as_ref(), options.framework);
                    match tokio::time::timeout(budget, work).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(UnitError::Timeout(budget.as_secs())),
                    }
                }
                Err(_) => Err(UnitError::Generation("worker pool shut down".into())),
            };
            if let Err(e) = &outcome {
                warn!(path = %unit.rel_path, error = %e, "unit failed");
            }
            let _ = tx.send(TestResult {
                source_path: unit.source,
                test_path: unit.test_path,
                outcome,
            });
        });
        handles.push((handle, placeholder));
    }
    drop(tx);

    let mut results = Vec::with_capacity(handles.len());
    for (handle, (source_path, test_path)) in handles {
        if let Err(e) = handle.await {
            warn!(path = %source_path.display(), error = %e, "unit aborted");
            results.push(TestResult {
                source_path,
                test_path,
                outcome: Err(UnitError::Generation(format!("unit aborted: {e}"))),
            });
        }
    }
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    let failed = results.iter().filter(|r| r.outcome.is_err()).count();
    info!(generated = results.len() - failed, failed, "pipeline finished");
    results
}

async fn run_unit(
    unit: &PlannedUnit,
    fs: Arc<dyn FileSystem>,
    generator: &dyn TestGenerator,
    framework: Framework,
) -> Result<String, UnitError> {
    let item = read_source(fs, unit.source.clone()).await?;
    debug!(path = %item.source.display(), bytes = item.text.len(), "source read");

    let request = GenerationRequest {
        rel_path: unit.rel_path.clone(),
        text: item.text,
        framework,
    };
    generator.generate(&request).await
}

/// Reads one source on the blocking thread pool.
async fn read_source(fs: Arc<dyn FileSystem>, source: PathBuf) -> Result<WorkItem, UnitError> {
    tokio::task::spawn_blocking(move || {
        let text = fs.read_to_string(&source).map_err(|e| UnitError::Read(e.to_string()))?;
        Ok(WorkItem { source, text })
    })
    .await
    .map_err(|e| UnitError::Read(format!("read task failed: {e}")))?
}
