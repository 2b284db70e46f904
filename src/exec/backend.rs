// src/exec/backend.rs

//! Pluggable pipeline runner abstraction.
//!
//! The coordinator talks to a `PipelineRunner` instead of spawning processes
//! itself. Production uses [`CommandPipeline`](super::CommandPipeline);
//! tests swap in a fake that records paths and sleeps on the virtual clock.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::record::RunRecord;

/// Runs whatever build/execute sequence applies to a changed file.
///
/// Implementations must:
/// - keep no state between calls that affects a later call,
/// - fully drain stdout/stderr before the returned future resolves,
/// - report pipeline failures in the record (`succeeded = false`) rather
///   than as errors; the coordinator treats a failed run like any other.
pub trait PipelineRunner: Send + Sync {
    fn execute(&self, path: PathBuf) -> Pin<Box<dyn Future<Output = RunRecord> + Send + '_>>;
}
