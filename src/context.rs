//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{
    AnthropicLlmClient, CommandLlmClient, LiveFileSystem, LiveGitRepo, LiveShellExecutor,
};
use crate::adapters::replaying::{
    ReplayingFileSystem, ReplayingGitRepo, ReplayingLlmClient, ReplayingShellExecutor,
};
use crate::cassette::{Cassette, CassetteReplayer};
use crate::config::AssistMode;
use crate::error::Result;
use crate::ports::{FileSystem, GitRepo, LlmClient, ShellExecutor};

/// Bundles all port trait objects into a single context.
///
/// Ports are reference-counted so pipeline workers can hold them across
/// spawned tasks.
#[derive(Clone)]
pub struct ServiceContext {
    /// Filesystem for file I/O and tree walks.
    pub fs: Arc<dyn FileSystem>,
    /// Git repository for dirtiness and change detection.
    pub git: Arc<dyn GitRepo>,
    /// Process executor for test and coverage runs.
    pub shell: Arc<dyn ShellExecutor>,
    /// Backend for assisted generation, when enabled.
    pub llm: Option<Arc<dyn LlmClient>>,
}

impl ServiceContext {
    /// Creates a live context. The LLM backend follows `assist`.
    #[must_use]
    pub fn live(assist: AssistMode, assist_command: &str) -> Self {
        let llm: Option<Arc<dyn LlmClient>> = match assist {
            AssistMode::Off => None,
            AssistMode::Command => Some(Arc::new(CommandLlmClient::new(assist_command))),
            AssistMode::Api => Some(Arc::new(AnthropicLlmClient::new())),
        };
        Self {
            fs: Arc::new(LiveFileSystem),
            git: Arc::new(LiveGitRepo),
            shell: Arc::new(LiveShellExecutor),
            llm,
        }
    }

    /// Creates a context whose every port replays `cassette`.
    #[must_use]
    pub fn replaying(cassette: &Cassette) -> Self {
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(cassette)));
        Self {
            fs: Arc::new(ReplayingFileSystem::new(Arc::clone(&replayer))),
            git: Arc::new(ReplayingGitRepo::new(Arc::clone(&replayer))),
            shell: Arc::new(ReplayingShellExecutor::new(Arc::clone(&replayer))),
            llm: Some(Arc::new(ReplayingLlmClient::new(replayer))),
        }
    }

    /// Loads a cassette file and creates a replaying context from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying_from(path: &Path) -> Result<Self> {
        Ok(Self::replaying(&Cassette::load(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::Interaction;
    use serde_json::json;

    #[test]
    fn replaying_context_shares_one_cassette_across_ports() {
        let cassette = Cassette::new(
            "ctx",
            vec![
                Interaction::new("git", "is_dirty", json!({"ok": false})),
                Interaction::new("fs", "read_to_string", json!({"ok": "{}"})),
            ],
        );
        let ctx = ServiceContext::replaying(&cassette);
        assert!(!ctx.git.is_dirty(Path::new(".")).unwrap());
        assert_eq!(ctx.fs.read_to_string(Path::new("package.json")).unwrap(), "{}");
    }

    #[test]
    fn replaying_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ServiceContext::replaying_from(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn live_context_without_assist_has_no_llm() {
        assert!(ServiceContext::live(AssistMode::Off, "auggie").llm.is_none());
        assert!(ServiceContext::live(AssistMode::Command, "auggie").llm.is_some());
    }
}
