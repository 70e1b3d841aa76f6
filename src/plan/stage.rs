// src/plan/stage.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::StageKind;

/// Callback run by a bundler right after a successful bundle.
pub type AfterBundle = Arc<dyn Fn(&StageSpec) -> anyhow::Result<()> + Send + Sync>;

/// Where a stage writes its artifacts, relative to its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Dir(PathBuf),
}

impl OutputTarget {
    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::File(p) | OutputTarget::Dir(p) => p,
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::File(p) => write!(f, "file {}", p.display()),
            OutputTarget::Dir(p) => write!(f, "dir {}", p.display()),
        }
    }
}

/// One bundling unit. Built by the planner, consumed once by the executor.
#[derive(Clone)]
pub struct StageSpec {
    pub kind: StageKind,
    pub name: String,
    /// Entry points, relative to `working_dir`.
    pub entry_points: Vec<PathBuf>,
    pub output: OutputTarget,
    /// Working-directory-relative paths excluded from the entry points.
    pub ignore: Vec<String>,
    pub working_dir: PathBuf,
    pub on_after_bundle: Option<AfterBundle>,
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("entry_points", &self.entry_points)
            .field("output", &self.output)
            .field("ignore", &self.ignore)
            .field("working_dir", &self.working_dir)
            .field("on_after_bundle", &self.on_after_bundle.is_some())
            .finish()
    }
}

impl StageSpec {
    pub fn new(
        kind: StageKind,
        working_dir: impl Into<PathBuf>,
        entry_points: Vec<PathBuf>,
        output: OutputTarget,
    ) -> Self {
        Self {
            kind,
            name: kind.bundler_name().to_string(),
            entry_points,
            output,
            ignore: Vec::new(),
            working_dir: working_dir.into(),
            on_after_bundle: None,
        }
    }

    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_after_bundle(mut self, callback: AfterBundle) -> Self {
        self.on_after_bundle = Some(callback);
        self
    }
}

/// All stages of one invocation: the primary config stage plus the optional
/// dependents, each `Some` only when its sources exist.
#[derive(Debug, Clone)]
pub struct PipelineStages {
    pub config: StageSpec,
    pub hooks: Option<StageSpec>,
    pub webhooks: Option<StageSpec>,
    pub operations: Option<StageSpec>,
}

impl PipelineStages {
    pub fn config_only(config: StageSpec) -> Self {
        Self {
            config,
            hooks: None,
            webhooks: None,
            operations: None,
        }
    }

    /// Every planned stage in fixed stage order.
    pub fn iter(&self) -> impl Iterator<Item = &StageSpec> {
        std::iter::once(&self.config)
            .chain(self.hooks.as_ref())
            .chain(self.webhooks.as_ref())
            .chain(self.operations.as_ref())
    }
}
