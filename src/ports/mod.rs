//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (filesystem, git, child processes, language models).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod git;
pub mod llm;
pub mod shell;

pub use filesystem::FileSystem;
pub use git::GitRepo;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};
pub use shell::{ShellExecutor, ShellOutput};
