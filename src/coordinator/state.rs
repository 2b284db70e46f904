// src/coordinator/state.rs

//! Pure run-slot state machine.
//!
//! `RunSlot` holds the single `RunState` and the most recently reported path.
//! Every method is an O(1) transition with no IO, no Tokio and no locking;
//! the caller (`Coordinator`) is responsible for holding the state lock while
//! calling into it.

use std::fmt;
use std::path::PathBuf;

use crate::errors::{Result, WhenChangedError};

/// Scheduling state shared by `notify` and the settle/run task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Nothing owed, no task alive.
    #[default]
    Idle,
    /// A run is owed and the settle wait has not finished yet.
    PendingSettle,
    /// A run is executing; no change has arrived since it started.
    Running,
    /// A run is executing and at least one change arrived after it started.
    RunningDirty,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "Idle",
            RunState::PendingSettle => "PendingSettle",
            RunState::Running => "Running",
            RunState::RunningDirty => "RunningDirty",
        };
        f.write_str(s)
    }
}

/// What `notify` did to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// `Idle -> PendingSettle`: the caller must spawn the settle/run task.
    Spawn,
    /// `PendingSettle` or `RunningDirty`: the recorded path was replaced.
    Coalesced(RunState),
    /// `Running -> RunningDirty`: one more run is owed after this one.
    MarkedDirty,
}

/// Decision taken once a run has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// `Running -> Idle`: the task exits.
    Idle,
    /// `RunningDirty -> PendingSettle`: settle again, then run `path`.
    Rerun { path: PathBuf },
}

/// The state value plus the pending path it guards.
#[derive(Debug, Default)]
pub struct RunSlot {
    state: RunState,
    pending: Option<PathBuf>,
}

impl RunSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The path the next run would use, if one is recorded.
    pub fn pending_path(&self) -> Option<&PathBuf> {
        self.pending.as_ref()
    }

    /// Record a change notification. Last write wins over the path.
    pub fn notify(&mut self, path: PathBuf) -> NotifyOutcome {
        self.pending = Some(path);
        match self.state {
            RunState::Idle => {
                self.state = RunState::PendingSettle;
                NotifyOutcome::Spawn
            }
            RunState::Running => {
                self.state = RunState::RunningDirty;
                NotifyOutcome::MarkedDirty
            }
            state @ (RunState::PendingSettle | RunState::RunningDirty) => {
                NotifyOutcome::Coalesced(state)
            }
        }
    }

    /// Settle wait is over: `PendingSettle -> Running`, capturing the path.
    pub fn begin_run(&mut self) -> Result<PathBuf> {
        if self.state != RunState::PendingSettle {
            return Err(WhenChangedError::InvariantViolation {
                state: self.state,
                during: "after the settle wait",
            });
        }
        let path = self.pending.take().ok_or(WhenChangedError::InvariantViolation {
            state: self.state,
            during: "with no recorded path at run start",
        })?;
        self.state = RunState::Running;
        Ok(path)
    }

    /// A run has completed (successfully or not).
    pub fn finish_run(&mut self) -> Result<FinishOutcome> {
        match self.state {
            RunState::Running => {
                self.state = RunState::Idle;
                Ok(FinishOutcome::Idle)
            }
            RunState::RunningDirty => {
                let path = self.pending.clone().ok_or(WhenChangedError::InvariantViolation {
                    state: self.state,
                    during: "with no recorded path for the re-run",
                })?;
                self.state = RunState::PendingSettle;
                Ok(FinishOutcome::Rerun { path })
            }
            state @ (RunState::Idle | RunState::PendingSettle) => {
                Err(WhenChangedError::InvariantViolation {
                    state,
                    during: "after a run finished",
                })
            }
        }
    }
}
