// src/discover/mod.rs

//! File and path discovery.
//!
//! Thin wrappers over [`FileSystem`] used by the planner:
//! - [`find_project_dir`] resolves the directory holding the entry points.
//! - [`entry_point_exists`] / [`directory_exists`] are the presence checks the
//!   pipeline shape is derived from.
//! - [`paths::discover_paths`] enumerates webhook and operation entry points.

pub mod filter;
pub mod paths;

use std::path::{Path, PathBuf};

use crate::errors::{PipelineError, Result};
use crate::fs::FileSystem;

pub use filter::EntryFilter;
pub use paths::{discover_paths, relative_str};

/// Resolve the project directory to an absolute path.
pub fn find_project_dir(fs: &dyn FileSystem, dir: &Path) -> Result<PathBuf> {
    if !fs.is_dir(dir) {
        return Err(PipelineError::ProjectDirNotFound(dir.to_path_buf()));
    }
    let abs = fs.canonicalize(dir)?;
    Ok(abs)
}

/// Path of the entry point `name` inside `dir`, if it is a regular file.
pub fn entry_point_exists(fs: &dyn FileSystem, dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if fs.is_file(&path) {
        Ok(path)
    } else {
        Err(PipelineError::EntryPointNotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        })
    }
}

pub fn directory_exists(fs: &dyn FileSystem, path: &Path) -> bool {
    fs.is_dir(path)
}
