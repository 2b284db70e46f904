// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::timer::DEFAULT_SETTLE;
use crate::types::{CoordinatorScope, Language};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// dir = "."
/// include = ["*.java"]
///
/// [run]
/// settle_ms = 1500
/// scope = "global"
///
/// [pipeline]
/// language = "java"
/// ```
///
/// All sections are optional; an empty file means "watch `*.java` in the
/// config directory and compile + run on change".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Directory to watch. Relative paths are resolved against the config
    /// file's directory by the loader.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Glob patterns (relative to `dir`) of files that trigger runs.
    /// If `None`, the language preset decides.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// Glob patterns that never trigger runs. Run log files are always
    /// excluded on top of these.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// Watch subdirectories. If `None`, the language preset decides.
    #[serde(default)]
    pub recursive: Option<bool>,
}

/// `[run]` section: scheduling behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Quiescence interval before each run, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// `"global"` (one run at a time for all files) or `"per_file"`.
    #[serde(default)]
    pub scope: CoordinatorScope,

    /// Optional per-stage timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE.as_millis() as u64
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            scope: CoordinatorScope::default(),
            timeout_secs: None,
        }
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSection {
    #[serde(default)]
    pub language: Language,

    /// Where `<file>_Log.txt` files go. Defaults to the watched directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Files removed after every run; placeholders allowed.
    #[serde(default)]
    pub cleanup: Option<Vec<String>>,

    /// `[[pipeline.stage]]` entries. Required for `language = "custom"`,
    /// replaces the preset stages otherwise.
    #[serde(default, rename = "stage")]
    pub stages: Vec<StageConfig>,
}

/// One `[[pipeline.stage]]` entry.
///
/// `program` and `args` may use `{file}`, `{name}`, `{stem}` and `{dir}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageConfig {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl StageConfig {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Validated configuration with presets applied.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub(crate) watch_dir: PathBuf,
    pub(crate) include: Vec<String>,
    pub(crate) exclude: Vec<String>,
    pub(crate) recursive: bool,
    pub(crate) settle: Duration,
    pub(crate) scope: CoordinatorScope,
    pub(crate) timeout: Option<Duration>,
    pub(crate) language: Language,
    pub(crate) stages: Vec<StageConfig>,
    pub(crate) cleanup: Vec<String>,
    pub(crate) log_dir: PathBuf,
}

impl ConfigFile {
    pub fn watch_dir(&self) -> &Path {
        &self.watch_dir
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn scope(&self) -> CoordinatorScope {
        self.scope
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    pub fn cleanup(&self) -> &[String] {
        &self.cleanup
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}
