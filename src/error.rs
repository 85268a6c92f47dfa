//! Error types.
//!
//! [`Error`] covers run-level failures that abort a command. [`UnitError`] is
//! the per-file failure carried inside a pipeline result; it stays local to
//! its unit and is only ever reported, never propagated.

use std::path::PathBuf;

/// Boxed error returned by port trait methods.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid flag or config-file value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying port error.
        #[source]
        source: PortError,
    },

    /// A manifest or config file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Neither jest nor vitest was found in the project.
    #[error("no test framework detected (jest or vitest required)")]
    FrameworkNotDetected,

    /// A version-control query failed.
    #[error("git: {0}")]
    Git(String),

    /// An external command could not be spawned or returned failure.
    #[error("{command} failed: {message}")]
    Command {
        /// Command line that was run.
        command: String,
        /// Failure description.
        message: String,
    },

    /// The working tree has uncommitted changes.
    #[error("working tree is dirty; commit changes or use --allow-dirty")]
    DirtyWorkingTree,

    /// Coverage is below the configured threshold.
    #[error("coverage {actual:.1}% is below minimum {minimum:.1}%")]
    CoverageBelowMinimum {
        /// Measured coverage.
        actual: f64,
        /// Required coverage.
        minimum: f64,
    },

    /// Every unit in the pipeline failed.
    #[error("all {0} generations failed")]
    AllFailed(usize),
}

/// Failure of a single pipeline unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    /// The source file could not be read.
    #[error("failed to read source: {0}")]
    Read(String),

    /// Extraction found nothing to test.
    #[error("no exported symbols found in {0}")]
    NoExports(String),

    /// The generator reported a failure.
    #[error("generation failed: {0}")]
    Generation(String),

    /// The unit exceeded its time budget.
    #[error("timed out after {0}s")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_error_messages_name_the_file() {
        let err = UnitError::NoExports("src/empty.ts".into());
        assert_eq!(err.to_string(), "no exported symbols found in src/empty.ts");
    }

    #[test]
    fn io_error_includes_path() {
        let err = Error::Io {
            path: PathBuf::from("a.ts"),
            source: "denied".into(),
        };
        assert_eq!(err.to_string(), "a.ts: denied");
    }

    #[test]
    fn coverage_error_formats_one_decimal() {
        let err = Error::CoverageBelowMinimum {
            actual: 41.3,
            minimum: 80.0,
        };
        assert_eq!(err.to_string(), "coverage 41.3% is below minimum 80.0%");
    }
}
