//! Live adapter for the `LlmClient` port backed by an assistant CLI.

use tokio::process::Command;

use crate::error::PortError;
use crate::ports::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

/// Runs `<program> -p <prompt>` and treats standard output as the completion.
///
/// The child is killed if the returned future is dropped, so a unit timeout
/// does not leave stray processes behind.
pub struct CommandLlmClient {
    program: String,
}

impl CommandLlmClient {
    /// Creates a client that invokes `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl LlmClient for CommandLlmClient {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let prompt = request.prompt.clone();

        Box::pin(async move {
            let output = Command::new(&self.program)
                .arg("-p")
                .arg(&prompt)
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| format!("failed to run {}: {e}", self.program))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(PortError::from(format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status.code().map_or_else(|| "signal".to_string(), |c| c.to_string()),
                    stderr.trim()
                )));
            }

            Ok(CompletionResponse { text: String::from_utf8_lossy(&output.stdout).into_owned() })
        })
    }
}
