// src/exec/stage.rs

//! Single stage process runner.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::record::{StageRecord, StageStatus};

/// A fully expanded command ready to run.
#[derive(Debug, Clone)]
pub struct StageCommand {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl StageCommand {
    /// Human-readable command line (not shell-escaped).
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }
}

/// Run one stage in `cwd`, capturing both output streams completely.
///
/// Never fails: spawn errors and timeouts become a `StageRecord` with the
/// matching `StageStatus`, so the pipeline can stop and still report.
pub async fn run_stage(command: &StageCommand, cwd: &Path, timeout: Option<Duration>) -> StageRecord {
    let cmdline = command.display();

    match run_stage_inner(command, cwd, timeout).await {
        Ok(Some((stdout, stderr, code))) => {
            info!(stage = %command.name, cmd = %cmdline, exit_code = code, "stage exited");
            StageRecord {
                name: command.name.clone(),
                command: cmdline.clone(),
                stdout,
                stderr,
                status: StageStatus::Exited(code),
            }
        }
        Ok(None) => {
            warn!(stage = %command.name, cmd = %cmdline, ?timeout, "stage timed out; process killed");
            StageRecord {
                name: command.name.clone(),
                command: cmdline.clone(),
                stdout: String::new(),
                stderr: String::new(),
                status: StageStatus::TimedOut,
            }
        }
        Err(err) => {
            warn!(stage = %command.name, cmd = %cmdline, error = %err, "stage could not be started");
            StageRecord {
                name: command.name.clone(),
                command: cmdline.clone(),
                stdout: String::new(),
                stderr: format!("{err:#}"),
                status: StageStatus::SpawnFailed,
            }
        }
    }
}

/// `Ok(None)` means the stage timed out.
async fn run_stage_inner(
    command: &StageCommand,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<Option<(String, String, i32)>> {
    debug!(stage = %command.name, cwd = %cwd.display(), "spawning stage process");

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}' for stage '{}'", command.program, command.name))?;

    // `wait_with_output` drains stdout and stderr concurrently, so neither
    // pipe can fill up and both are complete when it resolves. Dropping it on
    // timeout kills the child.
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(res) => res,
            Err(_) => return Ok(None),
        },
        None => child.wait_with_output().await,
    }
    .with_context(|| format!("waiting for stage '{}'", command.name))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let code = output.status.code().unwrap_or(-1);

    Ok(Some((stdout, stderr, code)))
}
