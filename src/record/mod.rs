// src/record/mod.rs

//! Run records and the per-file run log.
//!
//! - [`RunRecord`] is what a pipeline run produces: the path, timestamps, and
//!   the captured output of every stage that executed.
//! - [`sink`] appends records to `<file name>_Log.txt` files, or keeps them in
//!   memory.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

pub mod sink;

pub use sink::{format_entry, log_file_name, FileRunLog, MemoryRunLog, RunLog, LOG_FILE_SUFFIX};

/// How a single pipeline stage ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    /// The process exited. `-1` when no code was available (e.g. signal).
    Exited(i32),
    /// The process could not be started; the reason is in `stderr`.
    SpawnFailed,
    /// The stage exceeded its timeout and was killed.
    TimedOut,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Exited(code) => write!(f, "exit code {code}"),
            StageStatus::SpawnFailed => f.write_str("failed to start"),
            StageStatus::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Captured output of one executed stage.
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub name: String,
    /// Display form of the command line that was run.
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub status: StageStatus,
}

impl StageRecord {
    pub fn succeeded(&self) -> bool {
        self.status == StageStatus::Exited(0)
    }
}

/// Result of one pipeline run, handed to the run log and the runtime.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub path: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Stages that actually executed, in order. Stages after a failed one
    /// are skipped and do not appear here.
    pub stages: Vec<StageRecord>,
    pub succeeded: bool,
}

impl RunRecord {
    /// Build a record finishing now; it succeeded iff every stage did.
    pub fn from_stages(
        path: impl Into<PathBuf>,
        started_at: DateTime<Local>,
        stages: Vec<StageRecord>,
    ) -> Self {
        let succeeded = stages.iter().all(StageRecord::succeeded);
        Self {
            path: path.into(),
            started_at,
            finished_at: Local::now(),
            stages,
            succeeded,
        }
    }

    /// Combined stdout of all executed stages.
    pub fn stdout(&self) -> String {
        join_non_empty(self.stages.iter().map(|s| s.stdout.as_str()))
    }

    /// Combined stderr of all executed stages.
    pub fn stderr(&self) -> String {
        join_non_empty(self.stages.iter().map(|s| s.stderr.as_str()))
    }
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for part in parts.filter(|p| !p.is_empty()) {
        out.push_str(part);
        if !part.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
