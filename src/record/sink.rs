// src/record/sink.rs

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use super::RunRecord;

/// Suffix of per-file run logs; also excluded from watching.
pub const LOG_FILE_SUFFIX: &str = "_Log.txt";

/// Append-only destination for completed runs.
pub trait RunLog: Send + Sync {
    fn append(&self, record: &RunRecord) -> Result<()>;
}

/// Log file name for a watched file: `A.java` -> `A.java_Log.txt`.
pub fn log_file_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run".to_string());
    format!("{base}{LOG_FILE_SUFFIX}")
}

/// Writes one entry per run to `<dir>/<file name>_Log.txt`.
#[derive(Debug, Clone)]
pub struct FileRunLog {
    dir: PathBuf,
}

impl FileRunLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the entries for `path` are appended.
    pub fn log_path_for(&self, path: &Path) -> PathBuf {
        self.dir.join(log_file_name(path))
    }
}

impl RunLog for FileRunLog {
    fn append(&self, record: &RunRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating log dir {:?}", self.dir))?;

        let log_path = self.log_path_for(&record.path);
        let entry = format_entry(record);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("opening run log {:?}", log_path))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("appending to run log {:?}", log_path))?;

        debug!(log = %log_path.display(), "run log appended");
        Ok(())
    }
}

/// Render a record the way it is stored in the log file.
pub fn format_entry(record: &RunRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.started_at.format("%Y-%m-%d %H:%M:%S"));
    for stage in &record.stages {
        let _ = writeln!(
            out,
            "{} file: {} ({})",
            stage.name,
            record.path.display(),
            stage.status
        );
        let _ = writeln!(out, "{}", stage.stdout.trim_end());
        let _ = writeln!(out, "{}", stage.stderr.trim_end());
    }
    out.push('\n');
    out
}

/// Keeps records in memory, in append order.
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    records: Mutex<Vec<RunRecord>>,
}

impl MemoryRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl RunLog for MemoryRunLog {
    fn append(&self, record: &RunRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow!("memory run log mutex poisoned"))?
            .push(record.clone());
        Ok(())
    }
}
