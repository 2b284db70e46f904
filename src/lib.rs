// src/lib.rs

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod record;
pub mod runtime;
pub mod timer;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile, RawConfigFile};
use crate::coordinator::{Collaborators, CoordinatorEvent, CoordinatorSet};
use crate::exec::CommandPipeline;
use crate::record::FileRunLog;
use crate::runtime::{Runtime, RuntimeOptions};
use crate::timer::TokioSettleTimer;
use crate::watch::WatchFilter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - pipeline runner, settle timer and run log
/// - the coordinator set
/// - the file watcher (skipped for `--once`)
/// - the runtime shell and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut raw = load_or_default(&args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;
    apply_cli_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let filter = WatchFilter::from_config(&cfg)?;

    let (events_tx, events_rx) = mpsc::unbounded_channel::<CoordinatorEvent>();
    let collaborators = Collaborators {
        runner: Arc::new(CommandPipeline::from_config(&cfg)),
        timer: Arc::new(TokioSettleTimer),
        run_log: Arc::new(FileRunLog::new(cfg.log_dir())),
        events: events_tx,
    };
    let coordinators = Arc::new(CoordinatorSet::new(cfg.scope(), collaborators, cfg.settle())?);

    let _watcher_handle = match &args.once {
        Some(file) => {
            let file = file
                .canonicalize()
                .with_context(|| format!("resolving {:?}", file))?;
            info!(path = %file.display(), "running once");
            coordinators.notify(file)?;
            None
        }
        None => {
            println!(
                "whenchanged now watching: {} ({})",
                cfg.watch_dir().display(),
                cfg.include().join(", ")
            );
            println!("Ctrl-C to quit.");
            Some(crate::watch::spawn_watcher(
                cfg.watch_dir(),
                cfg.recursive(),
                filter,
                Arc::clone(&coordinators),
            )?)
        }
    };

    let options = RuntimeOptions {
        exit_when_idle: args.once.is_some(),
        echo_output: !args.quiet,
    };
    let runtime = Runtime::new(events_rx, options);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let summary = runtime.run_until(shutdown).await?;

    if args.once.is_some() && summary.failed > 0 {
        bail!("pipeline run failed");
    }
    Ok(())
}

/// CLI flags win over config file values.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(dir) = &args.dir {
        raw.watch.dir = Some(dir.clone());
    }
    if let Some(language) = args.language {
        raw.pipeline.language = language;
    }
    if let Some(settle_ms) = args.settle_ms {
        raw.run.settle_ms = settle_ms;
    }
    if let Some(scope) = args.scope {
        raw.run.scope = scope;
    }
    if let Some(log_dir) = &args.log_dir {
        raw.pipeline.log_dir = Some(log_dir.clone());
    }
}

/// Simple dry-run output: effective watch settings and pipeline stages.
fn print_dry_run(cfg: &ConfigFile) {
    println!("whenchanged dry-run");
    println!("  watch.dir = {}", cfg.watch_dir().display());
    println!("  watch.include = {:?}", cfg.include());
    println!("  watch.exclude = {:?}", cfg.exclude());
    println!("  watch.recursive = {}", cfg.recursive());
    println!("  run.settle_ms = {}", cfg.settle().as_millis());
    println!("  run.scope = {}", cfg.scope());
    if let Some(timeout) = cfg.timeout() {
        println!("  run.timeout_secs = {}", timeout.as_secs());
    }
    println!("  pipeline.language = {}", cfg.language());
    println!("  pipeline.log_dir = {}", cfg.log_dir().display());
    println!();

    println!("stages ({}):", cfg.stages().len());
    for stage in cfg.stages() {
        println!("  - {}: {} {}", stage.name, stage.program, stage.args.join(" "));
    }
    if !cfg.cleanup().is_empty() {
        println!("cleanup: {:?}", cfg.cleanup());
    }

    debug!("dry-run complete (no execution)");
}
