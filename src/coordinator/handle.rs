// src/coordinator/handle.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, error, info};

use crate::errors::{Result, WhenChangedError};

use super::run_loop::settle_and_run;
use super::state::{NotifyOutcome, RunSlot, RunState};
use super::{Collaborators, CoordinatorEvent};

/// State shared between a `Coordinator` handle and its settle/run task.
pub(crate) struct Shared {
    slot: Mutex<RunSlot>,
    pub(crate) settle: Duration,
    pub(crate) collaborators: Collaborators,
}

impl Shared {
    /// Acquire the state lock. A poisoned lock means some holder panicked
    /// mid-transition, so the slot can no longer be trusted.
    pub(crate) fn lock_slot(&self) -> Result<MutexGuard<'_, RunSlot>> {
        self.slot.lock().map_err(|_| WhenChangedError::LockPoisoned)
    }

    pub(crate) fn emit(&self, event: CoordinatorEvent) {
        // A closed receiver only means nobody is rendering progress.
        let _ = self.collaborators.events.send(event);
    }

    pub(crate) fn fail(&self, err: &WhenChangedError) {
        error!(error = %err, "run coordinator failed; scheduling can no longer be trusted");
        self.emit(CoordinatorEvent::Fatal {
            message: err.to_string(),
        });
    }
}

/// Cloneable handle onto one run slot.
///
/// `notify` only ever holds the state lock for an O(1) transition; the
/// pipeline itself runs on a background task spawned onto the Tokio runtime
/// captured at construction, so `notify` may be called from any thread.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("settle", &self.shared.settle)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator bound to the current Tokio runtime.
    pub fn new(collaborators: Collaborators, settle: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| WhenChangedError::NoRuntime)?;
        Ok(Self::with_runtime(runtime, collaborators, settle))
    }

    /// Create a coordinator that spawns its tasks onto `runtime`.
    pub fn with_runtime(runtime: Handle, collaborators: Collaborators, settle: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(RunSlot::new()),
                settle,
                collaborators,
            }),
            runtime,
        }
    }

    /// Report a change to `path`.
    ///
    /// Never waits for a run. The only error is a poisoned state lock, which
    /// is also reported as `CoordinatorEvent::Fatal`. The transition event is
    /// sent before the state lock is released.
    pub fn notify(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();

        let mut slot = match self.shared.lock_slot() {
            Ok(slot) => slot,
            Err(err) => {
                self.shared.fail(&err);
                return Err(err);
            }
        };

        // Events are sent with the lock held so they are ordered before
        // anything the settle/run task publishes after its next transition.
        match slot.notify(path.clone()) {
            NotifyOutcome::Spawn => {
                info!(path = %path.display(), settle_ms = self.shared.settle.as_millis() as u64, "change observed; run scheduled");
                self.shared.emit(CoordinatorEvent::Scheduled { path });
                self.spawn_task();
            }
            NotifyOutcome::MarkedDirty => {
                info!(path = %path.display(), "change observed while running; will run again");
                self.shared.emit(CoordinatorEvent::MarkedDirty { path });
            }
            NotifyOutcome::Coalesced(state) => {
                debug!(path = %path.display(), %state, "change coalesced");
                self.shared.emit(CoordinatorEvent::Coalesced { path, state });
            }
        }
        drop(slot);

        Ok(())
    }

    /// Current state of the slot.
    pub fn state(&self) -> Result<RunState> {
        Ok(self.shared.lock_slot()?.state())
    }

    /// Spawn the settle/run task. Called with the state lock held, right
    /// after the `Idle -> PendingSettle` transition, so two tasks can never
    /// be alive for the same slot.
    fn spawn_task(&self) {
        let shared = Arc::clone(&self.shared);
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            // Run the loop in its own task so a panic inside it is observed
            // here instead of leaving the slot stuck in `Running`.
            let result = match runtime.spawn(settle_and_run(Arc::clone(&shared))).await {
                Ok(result) => result,
                Err(join_err) => Err(WhenChangedError::TaskAborted(join_err.to_string())),
            };

            if let Err(err) = result {
                shared.fail(&err);
            }
        });
    }
}
