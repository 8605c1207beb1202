//! # Configuration
//!
//! Ambient settings of a merge run (logging and the consistency checker) are
//! read from a YAML file rendered through `tera`, so values can be pulled from
//! the environment:
//!
//! ```yaml
//! logger:
//!   level: {{ get_env(name="OWL_MERGE_LOG", default="info") }}
//!   format: compact
//! reasoner:
//!   enable: true
//!   backend:
//!     kind: command
//!     program: robot
//!     args: ["reason", "--input"]
//! ```
//!
//! The file is looked up at `$OWL_MERGE_CONFIG`, then at
//! `config/merge.yaml`. Without either, defaults apply.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{logger, Error, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "OWL_MERGE_CONFIG";
/// Configuration file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/merge.yaml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub reasoner: ReasonerSettings,
}

/// Logger configuration
///
/// Example (development):
/// ```yaml
/// # config/merge.yaml
/// logger:
///   enable: true
///   level: debug
///   format: compact
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    /// Enable log write to stdout
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Set the logger level.
    ///
    /// * options: `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default)]
    pub level: logger::LogLevel,

    /// Set the logger format.
    ///
    /// * options: `compact` | `pretty` | `json`
    #[serde(default)]
    pub format: logger::Format,

    /// Override our custom tracing filter.
    ///
    /// Set this to your own filter if you want to see traces from internal
    /// libraries. See more [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
    pub override_filter: Option<String>,

    /// Set this if you want to write log to file
    pub file_appender: Option<LoggerFileAppender>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: logger::LogLevel::default(),
            format: logger::Format::default(),
            override_filter: None,
            file_appender: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerFileAppender {
    /// Enable logger file appender
    pub enable: bool,

    /// Enable write log to file non-blocking
    #[serde(default)]
    pub non_blocking: bool,

    /// Set the logger file appender level.
    ///
    /// * options: `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default)]
    pub level: logger::LogLevel,

    /// Set the logger file appender format.
    ///
    /// * options: `compact` | `pretty` | `json`
    #[serde(default)]
    pub format: logger::Format,

    /// Set the logger file appender rotation.
    #[serde(default)]
    pub rotation: logger::Rotation,

    /// Set the logger file appender dir
    ///
    /// default is `./logs`
    pub dir: Option<String>,

    /// Set log filename prefix
    pub filename_prefix: Option<String>,

    /// Set log filename suffix
    pub filename_suffix: Option<String>,

    /// Set the logger file appender keep max log files.
    pub max_log_files: usize,
}

/// Consistency check run on the import ontology before merging.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReasonerSettings {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default)]
    pub backend: ReasonerBackend,
}

impl Default for ReasonerSettings {
    fn default() -> Self {
        Self {
            enable: true,
            backend: ReasonerBackend::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReasonerBackend {
    /// Built-in structural checks.
    #[default]
    Native,
    /// External reasoner; receives `args` followed by the ontology path.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Loads the configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error when a configuration file exists but cannot be read,
    /// rendered or parsed, or when `$OWL_MERGE_CONFIG` names a missing file.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::from_path(&fallback);
        }
        debug!("configuration_defaults_used");
        Ok(Self::default())
    }

    /// Reads, renders and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, rendered or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_template(&content)?;
        debug!(path = %path.display(), "configuration_loaded");
        Ok(config)
    }

    /// Renders `content` as a `tera` template, then parses it as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error on template or YAML failures.
    pub fn from_template(content: &str) -> Result<Self> {
        let rendered = tera::Tera::one_off(content, &tera::Context::new(), false)?;
        if rendered.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&rendered)?)
    }
}
