// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("project directory not found: {0:?}")]
    ProjectDirNotFound(PathBuf),

    #[error("entry point '{name}' not found in {dir:?}")]
    EntryPointNotFound { name: String, dir: PathBuf },

    #[error("Planning error: {0}")]
    Plan(String),

    #[error("{stage} failed: {reason}")]
    BundleFailed { stage: String, reason: String },

    #[error("configuration could not be generated. Process exit with code {exit_code}")]
    ProcessFailed { exit_code: i32 },

    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    /// Name of the stage this error originated from, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::BundleFailed { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Exit code of the supervised process, for process failures.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            PipelineError::ProcessFailed { exit_code } => Some(*exit_code),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PipelineError>;
