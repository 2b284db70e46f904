// src/runtime.rs

//! IO shell around the coordinators.
//!
//! The coordinators own all scheduling semantics and only publish
//! `CoordinatorEvent`s. This shell drains those events, prints the progress
//! report on stdout, and decides when the process should stop:
//! - on a `Fatal` event (returned as an error),
//! - on the shutdown future resolving (Ctrl-C in production),
//! - on the first `Idle` when `exit_when_idle` is set (`--once`),
//! - when every event sender is gone.

use std::future::Future;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::coordinator::{CoordinatorEvent, RunState};
use crate::errors::{Result, WhenChangedError};
use crate::record::RunRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Stop after the first coordinator returns to `Idle`.
    pub exit_when_idle: bool,
    /// Print captured program output, not just phase transitions.
    pub echo_output: bool,
}

/// Counts gathered while the runtime was active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub runs: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct Runtime {
    events: mpsc::UnboundedReceiver<CoordinatorEvent>,
    options: RuntimeOptions,
    summary: RunSummary,
}

impl Runtime {
    pub fn new(events: mpsc::UnboundedReceiver<CoordinatorEvent>, options: RuntimeOptions) -> Self {
        Self {
            events,
            options,
            summary: RunSummary::default(),
        }
    }

    /// Main event loop. Runs until `shutdown` resolves or a stop condition
    /// from the module docs is met.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        info!("whenchanged runtime started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        info!("coordinator event channel closed; exiting");
                        break;
                    };
                    debug!(?event, "runtime received event");
                    if !self.handle(event)? {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!(runs = self.summary.runs, failed = self.summary.failed, "runtime exiting");
        Ok(self.summary)
    }

    /// Render one event. Returns whether the loop should keep running.
    fn handle(&mut self, event: CoordinatorEvent) -> Result<bool> {
        match event {
            CoordinatorEvent::Scheduled { path } => {
                println!("{} File: {} changed", timestamp(), path.display());
            }
            CoordinatorEvent::Coalesced { path, state } => {
                if state == RunState::RunningDirty {
                    debug!(path = %path.display(), "already marked dirty");
                }
            }
            CoordinatorEvent::MarkedDirty { path } => {
                println!(
                    "{} File: {} changed -- output will be dirty - will run again soon...",
                    timestamp(),
                    path.display()
                );
            }
            CoordinatorEvent::RunStarted { path } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                println!("Running this file: {name}");
            }
            CoordinatorEvent::RunFinished { record } => {
                self.summary.runs += 1;
                if !record.succeeded {
                    self.summary.failed += 1;
                }
                self.report(&record);
            }
            CoordinatorEvent::Rerunning { path } => {
                println!("Re-running {} with the latest changes", path.display());
            }
            CoordinatorEvent::Idle { path } => {
                debug!(path = %path.display(), "coordinator idle");
                if self.options.exit_when_idle {
                    return Ok(false);
                }
            }
            CoordinatorEvent::Fatal { message } => {
                return Err(WhenChangedError::Fatal(message));
            }
        }
        Ok(true)
    }

    fn report(&self, record: &RunRecord) {
        if self.options.echo_output {
            for stage in &record.stages {
                println!("{}: {} ({})", stage.name, stage.command, stage.status);
                println!("Error/Console Output: ");
                print_block(&stage.stdout);
                print_block(&stage.stderr);
            }
        }
        let verdict = if record.succeeded { "succeeded" } else { "failed" };
        println!(
            "{} Run of {} {}",
            timestamp(),
            record.path.display(),
            verdict
        );
    }
}

fn print_block(text: &str) {
    let trimmed = text.trim_end();
    if !trimmed.is_empty() {
        println!("{trimmed}");
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
