// src/coordinator/set.rs

//! Global vs per-file coordinator scoping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::errors::{Result, WhenChangedError};
use crate::types::CoordinatorScope;

use super::{Collaborators, Coordinator, RunState};

enum Slots {
    Global(Coordinator),
    PerFile(Mutex<HashMap<PathBuf, Coordinator>>),
}

/// Routes change notifications to the right `Coordinator`.
///
/// With [`CoordinatorScope::Global`] every path shares one slot (one run at a
/// time system-wide, latest path wins). With [`CoordinatorScope::PerFile`] a
/// coordinator is created lazily for each distinct path; they share the
/// runner, timer, run log and event channel.
pub struct CoordinatorSet {
    scope: CoordinatorScope,
    settle: Duration,
    collaborators: Collaborators,
    runtime: Handle,
    slots: Slots,
}

impl std::fmt::Debug for CoordinatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorSet")
            .field("scope", &self.scope)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}

impl CoordinatorSet {
    /// Build a set bound to the current Tokio runtime.
    pub fn new(
        scope: CoordinatorScope,
        collaborators: Collaborators,
        settle: Duration,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| WhenChangedError::NoRuntime)?;

        let slots = match scope {
            CoordinatorScope::Global => Slots::Global(Coordinator::with_runtime(
                runtime.clone(),
                collaborators.clone(),
                settle,
            )),
            CoordinatorScope::PerFile => Slots::PerFile(Mutex::new(HashMap::new())),
        };

        Ok(Self {
            scope,
            settle,
            collaborators,
            runtime,
            slots,
        })
    }

    pub fn scope(&self) -> CoordinatorScope {
        self.scope
    }

    /// Forward a change notification to the coordinator owning `path`.
    ///
    /// In per-file scope, coordinators that have returned to `Idle` are
    /// dropped first, so the map only holds paths with a run pending or in
    /// flight. The map lock is held across the hand-off, which keeps a
    /// pruned coordinator from receiving a notification.
    pub fn notify(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        match &self.slots {
            Slots::Global(coordinator) => coordinator.notify(path),
            Slots::PerFile(map) => {
                let mut map = map.lock().map_err(|_| WhenChangedError::LockPoisoned)?;
                map.retain(|_, coordinator| !matches!(coordinator.state(), Ok(RunState::Idle)));
                let coordinator = map
                    .entry(path.clone())
                    .or_insert_with(|| self.new_coordinator(&path));
                coordinator.notify(path)
            }
        }
    }

    /// The coordinator responsible for `path`, creating it if needed.
    pub fn coordinator_for(&self, path: &Path) -> Result<Coordinator> {
        match &self.slots {
            Slots::Global(coordinator) => Ok(coordinator.clone()),
            Slots::PerFile(map) => {
                let mut map = map.lock().map_err(|_| WhenChangedError::LockPoisoned)?;
                let coordinator = map
                    .entry(path.to_path_buf())
                    .or_insert_with(|| self.new_coordinator(path));
                Ok(coordinator.clone())
            }
        }
    }

    fn new_coordinator(&self, path: &Path) -> Coordinator {
        debug!(path = %path.display(), "creating per-file coordinator");
        Coordinator::with_runtime(self.runtime.clone(), self.collaborators.clone(), self.settle)
    }

    /// Number of live coordinators. Idle per-file coordinators are only
    /// pruned on the next `notify`.
    pub fn len(&self) -> usize {
        match &self.slots {
            Slots::Global(_) => 1,
            Slots::PerFile(map) => map.lock().map(|m| m.len()).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
