// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::coordinator::CoordinatorSet;
use crate::watch::event_kind::changed_paths;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::WatchFilter;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root` that notifies `coordinators` for
/// every created, changed or renamed file matching `filter`.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    recursive: bool,
    filter: WatchFilter,
    coordinators: Arc<CoordinatorSet>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("whenchanged: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("whenchanged: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&root, mode)?;

    info!(root = %root.display(), recursive, "file watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let Some((kind, paths)) = changed_paths(&event) else {
                continue;
            };

            for path in paths {
                if path.is_dir() {
                    continue;
                }
                let Some(rel) = relative_str(&root, &path) else {
                    warn!(path = %path.display(), root = %root.display(), "could not relativize event path");
                    continue;
                };
                if !filter.matches(&rel) {
                    continue;
                }

                info!(path = %rel, %kind, "file {kind}");
                if let Err(err) = coordinators.notify(path) {
                    error!(error = %err, "coordinator rejected notification; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
