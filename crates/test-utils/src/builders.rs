#![allow(dead_code)]

use std::path::{Path, PathBuf};

use bundlegen::config::{ConfigFile, LayoutSection};
use bundlegen::fs::mock::MockFileSystem;
use bundlegen::plan::{OutputTarget, PipelineStages, StageSpec};
use bundlegen::types::StageKind;

/// Root used for mock projects.
pub const PROJECT_ROOT: &str = "/project";

/// Builder for an in-memory project tree laid out with the default
/// `[layout]` settings.
pub struct ProjectBuilder {
    fs: MockFileSystem,
    root: PathBuf,
    layout: LayoutSection,
}

impl ProjectBuilder {
    /// A project with only the primary config entry point.
    pub fn new() -> Self {
        let layout = LayoutSection::default();
        let fs = MockFileSystem::new();
        let root = PathBuf::from(PROJECT_ROOT);
        fs.add_file(root.join(&layout.config_entry), "export default {}");
        Self { fs, root, layout }
    }

    /// A project directory without any entry point.
    pub fn empty() -> Self {
        let fs = MockFileSystem::new();
        let root = PathBuf::from(PROJECT_ROOT);
        fs.add_dir(&root);
        Self {
            fs,
            root,
            layout: LayoutSection::default(),
        }
    }

    pub fn with_hooks(self) -> Self {
        self.fs
            .add_file(self.root.join(&self.layout.server_entry), "export default {}");
        self
    }

    pub fn with_webhook(self, name: &str) -> Self {
        self.fs.add_file(
            self.root.join(&self.layout.webhooks_dir).join(name),
            "export default () => {}",
        );
        self
    }

    pub fn with_operation(self, rel: &str) -> Self {
        self.fs.add_file(
            self.root.join(&self.layout.operations_dir).join(rel),
            "export default {}",
        );
        self
    }

    pub fn with_webhooks_dir(self) -> Self {
        self.fs.add_dir(self.root.join(&self.layout.webhooks_dir));
        self
    }

    pub fn with_operations_dir(self) -> Self {
        self.fs.add_dir(self.root.join(&self.layout.operations_dir));
        self
    }

    pub fn with_file(self, rel: &str) -> Self {
        self.fs.add_file(self.root.join(rel), "");
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build(self) -> (MockFileSystem, PathBuf, ConfigFile) {
        (self.fs, self.root, ConfigFile::default())
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stages for executor tests, without touching any filesystem.
pub fn stages(hooks: bool, webhooks: bool, operations: bool) -> PipelineStages {
    let out = PathBuf::from("generated/bundle");
    let stage = |kind: StageKind, entry: &str, output: OutputTarget| {
        StageSpec::new(kind, PROJECT_ROOT, vec![PathBuf::from(entry)], output)
    };

    PipelineStages {
        config: stage(
            StageKind::Config,
            "bundlegen.config.ts",
            OutputTarget::File(out.join("config.js")),
        ),
        hooks: hooks.then(|| {
            stage(
                StageKind::Hooks,
                "bundlegen.server.ts",
                OutputTarget::File(out.join("server.js")),
            )
        }),
        webhooks: webhooks.then(|| {
            stage(
                StageKind::Webhooks,
                "webhooks/github.ts",
                OutputTarget::Dir(out.join("webhooks")),
            )
        }),
        operations: operations.then(|| {
            stage(
                StageKind::Operations,
                "operations/users/get.ts",
                OutputTarget::Dir(out.join("operations")),
            )
        }),
    }
}
