//! Cassette data structures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording.
    pub seq: u64,
    /// Port name (`fs`, `git`, `shell`, `llm`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments the port was called with. When present, replay checks the
    /// actual call against every key recorded here.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Value returned: `{"ok": ...}`, `{"err": "message"}`, or a bare value.
    pub output: serde_json::Value,
}

impl Interaction {
    /// Convenience constructor for fixtures; `seq` is assigned by [`Cassette::new`].
    #[must_use]
    pub fn new(port: &str, method: &str, output: serde_json::Value) -> Self {
        Self {
            seq: 0,
            port: port.to_string(),
            method: method.to_string(),
            input: serde_json::Value::Null,
            output,
        }
    }

    /// Same interaction with recorded input arguments attached.
    #[must_use]
    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = input;
        self
    }
}

/// A named sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Project root the interactions were recorded against.
    #[serde(default)]
    pub project: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Builds a cassette from interactions, numbering them in order.
    #[must_use]
    pub fn new(name: &str, interactions: Vec<Interaction>) -> Self {
        let interactions = interactions
            .into_iter()
            .zip(0u64..)
            .map(|(interaction, seq)| Interaction { seq, ..interaction })
            .collect();
        Self {
            name: name.to_string(),
            recorded_at: Utc::now(),
            project: String::new(),
            interactions,
        }
    }

    /// Reads a YAML cassette from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`]
    /// if it is not a valid cassette.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Io {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_numbers_interactions() {
        let cassette = Cassette::new(
            "numbered",
            vec![
                Interaction::new("fs", "exists", json!(true)),
                Interaction::new("shell", "run", json!({"ok": {"exit_code": 0}})),
            ],
        );
        let seqs: Vec<_> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[test]
    fn load_reads_hand_written_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detect.cassette.yaml");
        std::fs::write(
            &path,
            r#"
name: detect
recorded_at: 2026-03-01T12:00:00Z
interactions:
  - seq: 0
    port: fs
    method: read_to_string
    output:
      ok: '{"devDependencies": {"vitest": "^1.0.0"}}'
"#,
        )
        .unwrap();

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "detect");
        assert!(cassette.project.is_empty());
        assert_eq!(cassette.interactions[0].input, serde_json::Value::Null);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "name: [unterminated").unwrap();

        let err = Cassette::load(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
