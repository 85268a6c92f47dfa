//! Replaying adapter for the `LlmClient` port.

use serde_json::json;

use super::{replay, SharedReplayer};
use crate::ports::llm::{CompletionRequest, LlmClient, LlmFuture};

/// Serves recorded completions.
pub struct ReplayingLlmClient {
    replayer: SharedReplayer,
}

impl ReplayingLlmClient {
    /// Creates a replaying client backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let input = json!({ "model": request.model, "prompt": request.prompt });
        let result = replay(&self.replayer, "llm", "complete", &input);
        Box::pin(async move { result })
    }
}
