//! Assisted generation through an external model, with local fallback.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{GenerateFuture, GenerationRequest, LocalGenerator, TestGenerator};
use crate::error::UnitError;
use crate::index::ProjectIndex;
use crate::model::{SourceFile, Symbol};
use crate::ports::{CompletionRequest, LlmClient};

const MAX_TOKENS: u32 = 8192;

/// Sends each file to an [`LlmClient`]; any failure falls back to local
/// synthesis. Never retries.
pub struct AssistedGenerator {
    llm: Arc<dyn LlmClient>,
    fallback: LocalGenerator,
    model: String,
    timeout: Duration,
}

impl AssistedGenerator {
    /// Creates a generator that gives `llm` at most `timeout` per file.
    ///
    /// When `fallback` carries an index, prompts include project context.
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmClient>,
        fallback: LocalGenerator,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            llm,
            fallback,
            model: model.into(),
            timeout,
        }
    }

    async fn generate_assisted(&self, request: &GenerationRequest) -> Result<String, UnitError> {
        let parsed = SourceFile::parse(request.rel_path.as_str(), request.text.as_str());
        let file = self
            .fallback
            .index()
            .and_then(|index| index.get(&request.rel_path))
            .unwrap_or(&parsed);
        if file.symbols.is_empty() {
            return Err(UnitError::NoExports(request.rel_path.clone()));
        }

        let completion = CompletionRequest {
            model: self.model.clone(),
            prompt: build_prompt(request, &file.symbols, self.fallback.index()),
            max_tokens: MAX_TOKENS,
        };

        let reply = tokio::time::timeout(self.timeout, self.llm.complete(&completion)).await;
        let reason = match reply {
            Ok(Ok(response)) => {
                let text = strip_code_fence(&response.text);
                if !text.trim().is_empty() {
                    debug!(path = %request.rel_path, "assisted generation succeeded");
                    return Ok(text);
                }
                "empty response".to_string()
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("no response within {}s", self.timeout.as_secs()),
        };

        warn!(
            path = %request.rel_path,
            reason = %reason,
            "assisted generation failed, using local synthesis"
        );
        self.fallback.generate_now(request)
    }
}

impl TestGenerator for AssistedGenerator {
    fn name(&self) -> &'static str {
        "assisted"
    }

    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> GenerateFuture<'a> {
        Box::pin(self.generate_assisted(request))
    }
}

fn symbol_line(out: &mut String, symbol: &Symbol) {
    let _ = write!(out, "- **{}** ({})", symbol.name, symbol.kind.label());
    if symbol.is_async {
        out.push_str(" [async]");
    }
    out.push('\n');
}

/// Prompt for one file: exports, related dependencies and similar files when
/// an index is available, the source itself, and the requirements.
#[must_use]
pub fn build_prompt(
    request: &GenerationRequest,
    symbols: &[Symbol],
    index: Option<&ProjectIndex>,
) -> String {
    let mut out = String::new();
    out.push_str("# Test Generation Context\n\n");
    let _ = writeln!(out, "## Target File\nFile: {}\n", request.rel_path);

    out.push_str("### Exported Symbols\n");
    for symbol in symbols {
        symbol_line(&mut out, symbol);
    }
    out.push('\n');

    if let Some(index) = index {
        let related = index.export_context(&request.rel_path);
        if !related.is_empty() {
            out.push_str("## Related Dependencies\n");
            for (path, exports) in related {
                let _ = writeln!(out, "### {path}");
                for symbol in exports {
                    let _ = writeln!(out, "- {} ({})", symbol.name, symbol.kind.label());
                }
                out.push('\n');
            }
        }

        let similar = index.similar_files(&request.rel_path, 3);
        if !similar.is_empty() {
            out.push_str("## Similar Files\n");
            for file in similar {
                let _ = writeln!(out, "- {} ({} shared exports)", file.path, file.score);
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "## Source Code\n```typescript\n{}\n```\n", request.text.trim_end());
    let _ = writeln!(out, "## Test Framework: {}\n", request.framework);

    out.push_str("## Test Generation Requirements\n");
    out.push_str("1. Generate comprehensive test cases covering happy paths and edge cases\n");
    let _ = writeln!(
        out,
        "2. Use {} and import the module under test from '../{}'",
        request.framework,
        crate::model::strip_extension(&request.rel_path)
    );
    out.push_str("3. Include tests for:\n");
    out.push_str("   - Basic functionality\n");
    out.push_str("   - Async operations (if applicable)\n");
    out.push_str("   - Error handling\n");
    out.push_str("   - Edge cases (null, undefined, empty inputs)\n");
    out.push_str("4. Mock external dependencies appropriately\n");
    out.push_str("5. Use descriptive test names\n");
    out.push_str("6. Return ONLY the test code, no explanations\n");
    out
}

/// Removes one Markdown code fence wrapped around the whole text, if present.
#[must_use]
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };
    let Some((_, body)) = rest.split_once('\n') else {
        return String::new();
    };
    let body = body.trim_end().strip_suffix("```").unwrap_or(body);
    let mut body = body.trim_end().to_string();
    body.push('\n');
    body
}
