// src/watch/event_kind.rs

//! Mapping from `notify` events to the change kinds the coordinator cares
//! about. Deletions are never forwarded.

use std::fmt;
use std::path::PathBuf;

use notify::event::{MetadataKind, ModifyKind, RenameMode};
use notify::{Event, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Changed,
    Created,
    Renamed,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Changed => f.write_str("changed"),
            ChangeKind::Created => f.write_str("created"),
            ChangeKind::Renamed => f.write_str("renamed"),
        }
    }
}

/// Classify a `notify` event kind; `None` means "ignore".
pub fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => None,
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Renamed),
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Other) => Some(ChangeKind::Changed),
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))
        | EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)) => Some(ChangeKind::Changed),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Remove(_) | EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// The paths of `event` that should be reported, with their kind.
///
/// For a rename carrying both names only the new name is reported.
pub fn changed_paths(event: &Event) -> Option<(ChangeKind, Vec<PathBuf>)> {
    let kind = classify(&event.kind)?;
    let paths = match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().cloned().into_iter().collect()
        }
        _ => event.paths.clone(),
    };
    Some((kind, paths))
}
