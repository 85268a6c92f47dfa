//! Test generators: the per-unit step that turns source text into test text.
//!
//! [`LocalGenerator`] synthesizes deterministically. [`AssistedGenerator`]
//! asks an external model first and falls back to local synthesis.

mod assist;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

pub use assist::{build_prompt, strip_code_fence, AssistedGenerator};

use crate::error::UnitError;
use crate::index::ProjectIndex;
use crate::model::{Framework, SourceFile};
use crate::synth::{synthesize_file, Mode};

/// Boxed future returned by [`TestGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, UnitError>> + Send + 'a>>;

/// Input to one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Source path relative to the project root, `/`-separated.
    pub rel_path: String,
    /// Source text as read.
    pub text: String,
    /// Target framework.
    pub framework: Framework,
}

/// Produces a test file for one source file.
pub trait TestGenerator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Generates the full test-file text.
    ///
    /// # Errors
    ///
    /// Returns a [`UnitError`] describing why this file produced no test.
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> GenerateFuture<'a>;
}

/// Deterministic local synthesis, optionally informed by a project index.
#[derive(Debug, Clone, Default)]
pub struct LocalGenerator {
    index: Option<Arc<ProjectIndex>>,
}

impl LocalGenerator {
    /// Generator that looks at each file on its own.
    #[must_use]
    pub fn standalone() -> Self {
        Self { index: None }
    }

    /// Generator that reuses `index` for symbols and related files.
    #[must_use]
    pub fn with_index(index: Arc<ProjectIndex>) -> Self {
        Self { index: Some(index) }
    }

    /// The index in use, if it finished building.
    #[must_use]
    pub fn index(&self) -> Option<&ProjectIndex> {
        self.index.as_deref().filter(|index| index.is_ready())
    }

    /// Synchronous core of [`TestGenerator::generate`].
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::NoExports`] when the file exports nothing.
    pub fn generate_now(&self, request: &GenerationRequest) -> Result<String, UnitError> {
        let Some(index) = self.index() else {
            let file = SourceFile::parse(request.rel_path.as_str(), request.text.as_str());
            return synthesize_file(&file, request.framework, &[], Mode::Standalone);
        };

        match index.get(&request.rel_path) {
            Some(file) => {
                let related: Vec<&str> = index.related_files(&file.path).into_keys().collect();
                debug!(path = %file.path, related = related.len(), "using indexed symbols");
                synthesize_file(file, request.framework, &related, Mode::Context)
            }
            None => {
                let file = SourceFile::parse(request.rel_path.as_str(), request.text.as_str());
                let mut related: Vec<&str> = file
                    .imports
                    .iter()
                    .filter_map(|target| index.resolve_import(&file.path, target))
                    .collect();
                related.sort_unstable();
                related.dedup();
                synthesize_file(&file, request.framework, &related, Mode::Context)
            }
        }
    }
}

impl TestGenerator for LocalGenerator {
    fn name(&self) -> &'static str {
        if self.index().is_some() {
            "local+context"
        } else {
            "local"
        }
    }

    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> GenerateFuture<'a> {
        Box::pin(async move { self.generate_now(request) })
    }
}
