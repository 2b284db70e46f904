// src/watch/path_utils.rs

//! Path helpers for matching event paths against watch globs.

use std::path::Path;

/// `path` relative to `root` as a forward-slash string, or `None` when the
/// path lies outside the root.
///
/// A plain `strip_prefix` is tried first; if the prefixes differ (symlinked
/// temp dirs such as macOS `/private/var`), both sides are canonicalized and
/// compared again. Deleted paths cannot be canonicalized and only match the
/// fast path.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(forward_slashes(rel));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok()?;
    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(forward_slashes)
}

fn forward_slashes(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
