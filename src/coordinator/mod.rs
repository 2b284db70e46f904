// src/coordinator/mod.rs

//! Debounced, coalescing run coordinator.
//!
//! This module turns a noisy stream of change notifications into a sequence
//! of pipeline runs with at most one run in flight per coordinator:
//!
//! - [`state`] is the pure `RunSlot` state machine (`Idle`, `PendingSettle`,
//!   `Running`, `RunningDirty`).
//! - [`handle`] owns the state lock and implements `notify`.
//! - [`run_loop`] is the settle -> run -> re-evaluate loop executed by the
//!   background task that `notify` spawns from `Idle`.
//! - [`set`] decides whether all files share one coordinator or each file
//!   gets its own.
//!
//! Every transition is reported as a [`CoordinatorEvent`] so the runtime
//! shell can render progress without touching coordinator state.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::exec::PipelineRunner;
use crate::record::{RunLog, RunRecord};
use crate::timer::SettleTimer;

pub mod handle;
pub mod run_loop;
pub mod set;
pub mod state;

pub use handle::Coordinator;
pub use set::CoordinatorSet;
pub use state::{FinishOutcome, NotifyOutcome, RunSlot, RunState};

/// Transition events emitted by coordinators.
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    /// `Idle -> PendingSettle`; a settle/run task was spawned.
    Scheduled { path: PathBuf },
    /// A notification replaced the recorded path without changing state.
    Coalesced { path: PathBuf, state: RunState },
    /// `Running -> RunningDirty`; the current output will be stale.
    MarkedDirty { path: PathBuf },
    /// `PendingSettle -> Running`; the pipeline is starting on `path`.
    RunStarted { path: PathBuf },
    /// The pipeline returned. Emitted after the run log was written.
    RunFinished { record: RunRecord },
    /// `RunningDirty -> PendingSettle`; another settle + run follows.
    Rerunning { path: PathBuf },
    /// `Running -> Idle`; the task for `path` has exited.
    Idle { path: PathBuf },
    /// Unrecoverable scheduling failure. The process should exit.
    Fatal { message: String },
}

/// Everything a coordinator calls into besides its own state.
#[derive(Clone)]
pub struct Collaborators {
    pub runner: Arc<dyn PipelineRunner>,
    pub timer: Arc<dyn SettleTimer>,
    pub run_log: Arc<dyn RunLog>,
    pub events: mpsc::UnboundedSender<CoordinatorEvent>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
