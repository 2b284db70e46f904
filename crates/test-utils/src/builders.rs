#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use whenchanged::config::{ConfigFile, RawConfigFile, StageConfig};
use whenchanged::coordinator::{Collaborators, CoordinatorEvent};
use whenchanged::exec::PipelineRunner;
use whenchanged::record::{MemoryRunLog, RunLog};
use whenchanged::timer::TokioSettleTimer;
use whenchanged::types::{CoordinatorScope, Language};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.config.pipeline.language = language;
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.watch.dir = Some(dir.into());
        self
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.config
            .watch
            .include
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config
            .watch
            .exclude
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.config.run.settle_ms = ms;
        self
    }

    pub fn scope(mut self, scope: CoordinatorScope) -> Self {
        self.config.run.scope = scope;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.run.timeout_secs = Some(secs);
        self
    }

    pub fn stage(mut self, name: &str, program: &str, args: &[&str]) -> Self {
        self.config
            .pipeline
            .stages
            .push(StageConfig::new(name, program, args));
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Collaborators wired to `runner`, the Tokio timer and an in-memory log.
///
/// Returns the event receiver and the log so tests can inspect both.
pub fn collaborators_with(
    runner: impl PipelineRunner + 'static,
) -> (
    Collaborators,
    mpsc::UnboundedReceiver<CoordinatorEvent>,
    Arc<MemoryRunLog>,
) {
    collaborators_with_log(runner, Arc::new(MemoryRunLog::new()))
}

pub fn collaborators_with_log<L: RunLog + 'static>(
    runner: impl PipelineRunner + 'static,
    run_log: Arc<L>,
) -> (
    Collaborators,
    mpsc::UnboundedReceiver<CoordinatorEvent>,
    Arc<L>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let collaborators = Collaborators {
        runner: Arc::new(runner),
        timer: Arc::new(TokioSettleTimer),
        run_log: run_log.clone(),
        events: tx,
    };
    (collaborators, rx, run_log)
}

/// Settle interval most scheduling tests use.
pub const SETTLE: Duration = Duration::from_millis(1000);
