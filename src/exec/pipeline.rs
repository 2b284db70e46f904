// src/exec/pipeline.rs

//! Multi-stage command pipeline used in production.

use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::{ConfigFile, StageConfig};
use crate::record::{RunRecord, StageRecord};

use super::backend::PipelineRunner;
use super::stage::{run_stage, StageCommand};
use super::template::FileContext;

/// Runs the configured stages in order, stopping at the first failure.
///
/// Each stage runs in the changed file's directory without a shell. Once the
/// stages are done, `cleanup` entries (e.g. `{dir}/{stem}.class`) are removed
/// whether the run succeeded or not.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    stages: Vec<StageConfig>,
    cleanup: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandPipeline {
    pub fn new(stages: Vec<StageConfig>, cleanup: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            stages,
            cleanup,
            timeout,
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(cfg.stages().to_vec(), cfg.cleanup().to_vec(), cfg.timeout())
    }

    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    /// Expand every stage for `ctx`.
    pub fn commands_for(&self, ctx: &FileContext) -> Vec<StageCommand> {
        self.stages
            .iter()
            .map(|stage| StageCommand {
                name: stage.name.clone(),
                program: ctx.expand(&stage.program),
                args: stage.args.iter().map(|a| ctx.expand(a)).collect(),
            })
            .collect()
    }

    async fn run(&self, path: PathBuf) -> RunRecord {
        let started_at = Local::now();
        let ctx = FileContext::from_path(&path);

        let mut records: Vec<StageRecord> = Vec::with_capacity(self.stages.len());
        for command in self.commands_for(&ctx) {
            let record = run_stage(&command, &ctx.dir, self.timeout).await;
            let ok = record.succeeded();
            records.push(record);
            if !ok {
                info!(stage = %command.name, path = %path.display(), "stage failed; skipping remaining stages");
                break;
            }
        }

        self.clean_up(&ctx).await;

        RunRecord::from_stages(path, started_at, records)
    }

    async fn clean_up(&self, ctx: &FileContext) {
        for entry in &self.cleanup {
            let target = PathBuf::from(ctx.expand(entry));
            match tokio::fs::remove_file(&target).await {
                Ok(()) => debug!(path = %target.display(), "removed build artifact"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %target.display(), error = %err, "failed to remove build artifact")
                }
            }
        }
    }
}

impl PipelineRunner for CommandPipeline {
    fn execute(&self, path: PathBuf) -> Pin<Box<dyn Future<Output = RunRecord> + Send + '_>> {
        Box::pin(self.run(path))
    }
}
