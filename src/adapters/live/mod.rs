//! Live adapters for real external interactions.

pub mod command;
pub mod filesystem;
pub mod git;
pub mod llm;
pub mod shell;

pub use command::CommandLlmClient;
pub use filesystem::LiveFileSystem;
pub use git::LiveGitRepo;
pub use llm::AnthropicLlmClient;
pub use shell::LiveShellExecutor;
