// src/coordinator/run_loop.rs

//! The settle -> run -> re-evaluate loop.

use std::sync::Arc;

use tokio::task;
use tracing::{info, warn};

use crate::errors::Result;
use crate::record::RunRecord;

use super::handle::Shared;
use super::state::FinishOutcome;
use super::CoordinatorEvent;

/// Body of the background task spawned on `Idle -> PendingSettle`.
///
/// Loops while runs are owed and returns once the slot is back to `Idle`.
/// The state lock is only taken for the two transitions around the run,
/// never across the settle wait or the pipeline itself. Transition events
/// are sent while it is held, so the event stream follows the order of the
/// transitions.
pub(crate) async fn settle_and_run(shared: Arc<Shared>) -> Result<()> {
    loop {
        shared.collaborators.timer.wait(shared.settle).await;

        let path = {
            let mut slot = shared.lock_slot()?;
            let path = slot.begin_run()?;
            shared.emit(CoordinatorEvent::RunStarted { path: path.clone() });
            path
        };

        info!(path = %path.display(), "running pipeline");

        let record = shared.collaborators.runner.execute(path.clone()).await;

        info!(
            path = %path.display(),
            succeeded = record.succeeded,
            stages = record.stages.len(),
            "pipeline finished"
        );

        append_run_log(&shared, &record).await;
        shared.emit(CoordinatorEvent::RunFinished { record });

        let rerun = {
            let mut slot = shared.lock_slot()?;
            match slot.finish_run()? {
                FinishOutcome::Idle => {
                    shared.emit(CoordinatorEvent::Idle { path });
                    false
                }
                FinishOutcome::Rerun { path } => {
                    info!(path = %path.display(), "changes arrived during the run; running again");
                    shared.emit(CoordinatorEvent::Rerunning { path });
                    true
                }
            }
        };

        if !rerun {
            return Ok(());
        }
    }
}

/// Hand the record to the run log on the blocking pool. Failures are only
/// logged; the in-memory record is still reported.
async fn append_run_log(shared: &Shared, record: &RunRecord) {
    let run_log = Arc::clone(&shared.collaborators.run_log);
    let entry = record.clone();

    match task::spawn_blocking(move || run_log.append(&entry)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(path = %record.path.display(), error = %err, "failed to append run log")
        }
        Err(err) => {
            warn!(path = %record.path.display(), error = %err, "run log writer did not complete")
        }
    }
}
