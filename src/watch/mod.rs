// src/watch/mod.rs

//! File watching: the change source feeding the run coordinators.
//!
//! This module is responsible for:
//! - Compiling `include` / `exclude` glob patterns.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Turning `notify` events into `changed` / `created` / `renamed`
//!   notifications; deletions are dropped.
//!
//! It knows nothing about run states; it only calls `CoordinatorSet::notify`.

pub mod event_kind;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use event_kind::{changed_paths, classify, ChangeKind};
pub use patterns::WatchFilter;
pub use watcher::{spawn_watcher, WatcherHandle};
