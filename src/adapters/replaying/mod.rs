//! Replaying adapters that serve recorded interactions from a cassette.
//!
//! All adapters built from one cassette share a single replayer, so a test
//! fixture is one file listing every port call in order.

pub mod filesystem;
pub mod git;
pub mod llm;
pub mod shell;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

pub use filesystem::ReplayingFileSystem;
pub use git::ReplayingGitRepo;
pub use llm::ReplayingLlmClient;
pub use shell::ReplayingShellExecutor;

use crate::cassette::replayer::{decode, CassetteReplayer};
use crate::error::PortError;

/// Replayer shared between the adapters of one context.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Pops and decodes the next output recorded for `port::method`, checking
/// the call's `input` against the recording.
fn replay<T: DeserializeOwned>(
    replayer: &SharedReplayer,
    port: &str,
    method: &str,
    input: &serde_json::Value,
) -> Result<T, PortError> {
    let output = {
        let mut guard =
            replayer.lock().map_err(|_| PortError::from("cassette replayer lock poisoned"))?;
        guard.next_output(port, method, input)?
    };
    decode(output, &format!("{port}::{method}"))
}
