//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use serde::de::DeserializeOwned;

use super::format::{Cassette, Interaction};
use crate::error::PortError;

/// Serves interactions sequentially per port/method pair.
///
/// Independent pairs have independent cursors, so interleaving between
/// ports (or between concurrent pipeline units) does not matter; only the
/// order of calls to the same method does.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Pops the next recorded output for `port::method` called with `input`.
    ///
    /// A recorded non-null input must agree with `input` on every key it
    /// names; keys it leaves out are not checked.
    ///
    /// # Errors
    ///
    /// Returns an error naming the pair when nothing (more) was recorded for
    /// it, or when the recorded input disagrees with the actual call.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<serde_json::Value, PortError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(format!(
                "cassette has no interactions for {port}::{method} (available: [{}])",
                available.join(", ")
            )
            .into());
        };
        let interaction = queue
            .pop_front()
            .ok_or_else(|| PortError::from(format!("cassette exhausted for {port}::{method}")))?;
        if !input_matches(&interaction.input, input) {
            let (seq, recorded) = (interaction.seq, &interaction.input);
            return Err(format!(
                "cassette input mismatch for {port}::{method} at seq {seq}: \
                 recorded {recorded}, called with {input}"
            )
            .into());
        }
        Ok(interaction.output)
    }

    /// Number of interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

/// Whether an actual call agrees with what was recorded for it.
fn input_matches(recorded: &serde_json::Value, actual: &serde_json::Value) -> bool {
    match (recorded, actual) {
        (serde_json::Value::Null, _) => true,
        (serde_json::Value::Object(expected), serde_json::Value::Object(actual)) => {
            expected.iter().all(|(key, value)| actual.get(key) == Some(value))
        }
        (expected, actual) => expected == actual,
    }
}

/// Decodes a recorded output into a port result.
///
/// `{"err": "message"}` becomes an error, `{"ok": value}` and bare values
/// are deserialized as `T`.
///
/// # Errors
///
/// Returns the recorded error, or a decode error naming `context`.
pub fn decode<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("ok").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("{context}: bad recorded output: {e}").into())
}
