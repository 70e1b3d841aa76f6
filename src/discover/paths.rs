// src/discover/paths.rs

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::discover::EntryFilter;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Convert `path` into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` is not below `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// Enumerate entry points below `dir`, relative to `root`.
///
/// - `recursive = false` only looks at the direct children of `dir`
///   (webhooks are one file per hook).
/// - `recursive = true` walks the whole tree (operations may be nested).
///
/// The result is sorted so that bundler invocations are reproducible.
pub fn discover_paths(
    fs: &dyn FileSystem,
    root: &Path,
    dir: &Path,
    filter: &EntryFilter,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs.read_dir(&current)? {
            let Some(rel) = relative_str(root, &entry) else {
                trace!(path = %entry.display(), "entry outside project root; skipping");
                continue;
            };

            if fs.is_dir(&entry) {
                if recursive && !filter.is_ignored(&rel) {
                    pending.push(entry);
                }
                continue;
            }

            if filter.matches(&rel) {
                found.push(PathBuf::from(rel));
            } else {
                trace!(path = %rel, "not an entry point");
            }
        }
    }

    found.sort();
    debug!(dir = %dir.display(), count = found.len(), "discovered entry points");
    Ok(found)
}
