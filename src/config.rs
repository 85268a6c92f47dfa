//! Run configuration: `generate` flags merged over `.autotest.yaml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::GenerateArgs;
use crate::error::{Error, Result};
use crate::model::Framework;
use crate::ports::FileSystem;

/// Name of the optional project config file, looked up in the root.
pub const CONFIG_FILE: &str = ".autotest.yaml";

/// Assistant command used when none is configured.
pub const DEFAULT_ASSIST_COMMAND: &str = "auggie";

/// Model used by the API backend when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Per-unit timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Framework selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkChoice {
    /// Detect from `package.json` and lockfiles.
    #[default]
    Auto,
    /// Force jest.
    Jest,
    /// Force vitest.
    Vitest,
}

impl FrameworkChoice {
    /// The forced framework, if any.
    #[must_use]
    pub fn fixed(self) -> Option<Framework> {
        match self {
            Self::Auto => None,
            Self::Jest => Some(Framework::Jest),
            Self::Vitest => Some(Framework::Vitest),
        }
    }
}

/// Enhanced-generation backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    /// Local synthesis only.
    #[default]
    Off,
    /// An assistant CLI invoked as `<program> -p <prompt>`.
    Command,
    /// The Anthropic messages API.
    Api,
}

/// Contents of `.autotest.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct FileConfig {
    /// Framework selection.
    pub framework: Option<FrameworkChoice>,
    /// Output root for generated tests.
    pub out: Option<PathBuf>,
    /// Worker limit.
    pub max_workers: Option<usize>,
    /// Per-unit timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Minimum acceptable coverage percentage.
    pub min_coverage: Option<f64>,
    /// Enhanced-generation backend.
    pub assist: Option<AssistMode>,
    /// Assistant program for [`AssistMode::Command`].
    pub assist_command: Option<String>,
    /// Model for [`AssistMode::Api`].
    pub model: Option<String>,
}

impl FileConfig {
    /// Loads `root/.autotest.yaml`; absent file means all defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file exists but cannot be read, and
    /// [`Error::Parse`] if it is not valid.
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !fs.exists(&path) {
            return Ok(Self::default());
        }
        let text = fs
            .read_to_string(&path)
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "loaded project config");
        Self::parse(&text, &path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
            .map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Fully resolved settings for one `generate` run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Project root.
    pub root: PathBuf,
    /// Framework selection.
    pub framework: FrameworkChoice,
    /// Output root for generated tests.
    pub out_dir: Option<PathBuf>,
    /// Plan only; write nothing.
    pub dry_run: bool,
    /// Restrict candidates to files changed against upstream.
    pub changed_only: bool,
    /// Explicit upstream reference.
    pub base: Option<String>,
    /// Worker limit, at least 1.
    pub max_workers: usize,
    /// Minimum acceptable coverage percentage.
    pub min_coverage: Option<f64>,
    /// Skip the dirty-tree check.
    pub allow_dirty: bool,
    /// Per-unit timeout, non-zero.
    pub timeout: Duration,
    /// Build the project index and synthesize with it.
    pub context: bool,
    /// Enhanced-generation backend.
    pub assist: AssistMode,
    /// Assistant program.
    pub assist_command: String,
    /// API model.
    pub model: String,
    /// Run the test suite after writing.
    pub run_tests: bool,
}

impl RunConfig {
    /// Merges flags over file values over defaults, then validates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero worker limit, a zero timeout, or
    /// a coverage threshold outside 0 to 100.
    pub fn resolve(args: &GenerateArgs, file: FileConfig) -> Result<Self> {
        let config = Self {
            root: args.root.clone(),
            framework: args.fw.or(file.framework).unwrap_or_default(),
            out_dir: args.out.clone().or(file.out),
            dry_run: args.dry_run,
            changed_only: args.changed_only,
            base: args.base.clone(),
            max_workers: args.max_workers.or(file.max_workers).unwrap_or_else(default_workers),
            min_coverage: args.min_coverage.or(file.min_coverage),
            allow_dirty: args.allow_dirty,
            timeout: Duration::from_secs(
                args.timeout_secs.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            context: args.context,
            assist: args.assist.or(file.assist).unwrap_or_default(),
            assist_command: args
                .assist_command
                .clone()
                .or(file.assist_command)
                .unwrap_or_else(|| DEFAULT_ASSIST_COMMAND.to_string()),
            model: args.model.clone().or(file.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            run_tests: !args.no_run,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Config("max workers must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be at least 1 second".into()));
        }
        if let Some(min) = self.min_coverage {
            if !(0.0..=100.0).contains(&min) {
                return Err(Error::Config(format!(
                    "min coverage must be between 0 and 100, got {min}"
                )));
            }
        }
        if self.assist == AssistMode::Command && self.assist_command.trim().is_empty() {
            return Err(Error::Config("assist command must not be empty".into()));
        }
        Ok(())
    }
}

/// Available hardware parallelism, or 1 when unknown.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}
