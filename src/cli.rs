// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::types::{CoordinatorScope, Language};

/// Command-line arguments for `whenchanged`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "whenchanged",
    version,
    about = "Watch a directory and compile + run each source file when it changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `WhenChanged.toml` in the current working directory; built-in
    /// defaults are used if that file does not exist.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory to watch (overrides `[watch].dir`).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Toolchain preset: java, python or custom (overrides `[pipeline].language`).
    #[arg(long, value_name = "LANG")]
    pub language: Option<Language>,

    /// Settle interval in milliseconds (overrides `[run].settle_ms`).
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Coordinator scope: global or per_file (overrides `[run].scope`).
    #[arg(long, value_name = "SCOPE")]
    pub scope: Option<CoordinatorScope>,

    /// Directory for `<file>_Log.txt` run logs (overrides `[pipeline].log_dir`).
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Run the pipeline once for FILE (after the settle interval), no watching.
    #[arg(long, value_name = "FILE")]
    pub once: Option<PathBuf>,

    /// Only print phase transitions, not the captured program output.
    #[arg(long)]
    pub quiet: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WHENCHANGED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective pipeline, but don't watch or run.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
