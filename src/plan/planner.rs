// src/plan/planner.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LayoutSection;
use crate::discover::{self, EntryFilter};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::plan::stage::{OutputTarget, PipelineStages, StageSpec};
use crate::types::{PipelineShape, SourcePresence, StageKind};

/// Decides which stages apply to a project directory.
///
/// All decisions are read-only existence checks made at call time; nothing
/// is cached between calls.
#[derive(Debug)]
pub struct PipelinePlanner<'a> {
    fs: &'a dyn FileSystem,
    layout: &'a LayoutSection,
}

impl<'a> PipelinePlanner<'a> {
    pub fn new(fs: &'a dyn FileSystem, layout: &'a LayoutSection) -> Self {
        Self { fs, layout }
    }

    /// Check which optional sources exist.
    ///
    /// Fails only when the primary config entry point is missing.
    pub fn detect(&self, work_dir: &Path) -> Result<SourcePresence> {
        discover::entry_point_exists(self.fs, work_dir, &self.layout.config_entry)?;

        let hooks = discover::entry_point_exists(self.fs, work_dir, &self.layout.server_entry)
            .is_ok();
        if !hooks {
            info!(file = %self.layout.server_entry, "hooks entry point not found, skipping");
        }

        let presence = SourcePresence {
            hooks,
            webhooks: discover::directory_exists(self.fs, &work_dir.join(&self.layout.webhooks_dir)),
            operations: discover::directory_exists(
                self.fs,
                &work_dir.join(&self.layout.operations_dir),
            ),
        };
        debug!(?presence, "detected sources");
        Ok(presence)
    }

    pub fn plan(&self, work_dir: &Path) -> Result<PipelineShape> {
        self.detect(work_dir).map(PipelineShape::from_presence)
    }

    /// Build the stage descriptions for a detected layout.
    ///
    /// Webhook and operation stages only exist alongside a hooks entry point.
    pub fn stages(&self, work_dir: &Path, presence: SourcePresence) -> Result<PipelineStages> {
        let out_dir = &self.layout.out_dir;

        let config = StageSpec::new(
            StageKind::Config,
            work_dir,
            vec![self.layout.config_entry.clone().into()],
            OutputTarget::File(out_dir.join("config.js")),
        );

        if !presence.hooks {
            return Ok(PipelineStages::config_only(config));
        }

        let hooks = StageSpec::new(
            StageKind::Hooks,
            work_dir,
            vec![self.layout.server_entry.clone().into()],
            OutputTarget::File(out_dir.join("server.js")),
        );

        let filter = EntryFilter::new(&self.layout.extensions, &self.layout.ignore)?;

        let webhooks = if presence.webhooks {
            Some(self.directory_stage(
                StageKind::Webhooks,
                work_dir,
                &self.layout.webhooks_dir,
                &filter,
                false,
            )?)
        } else {
            None
        };

        let operations = if presence.operations {
            Some(self.directory_stage(
                StageKind::Operations,
                work_dir,
                &self.layout.operations_dir,
                &filter,
                true,
            )?)
        } else {
            None
        };

        Ok(PipelineStages {
            config,
            hooks: Some(hooks),
            webhooks,
            operations,
        })
    }

    fn directory_stage(
        &self,
        kind: StageKind,
        work_dir: &Path,
        dir_name: &str,
        filter: &EntryFilter,
        recursive: bool,
    ) -> Result<StageSpec> {
        let entry_points =
            discover::discover_paths(self.fs, work_dir, &work_dir.join(dir_name), filter, recursive)?;

        let stage = StageSpec::new(
            kind,
            work_dir,
            entry_points,
            OutputTarget::Dir(self.layout.out_dir.join(dir_name)),
        )
        .with_after_bundle(Arc::new(|stage: &StageSpec| -> anyhow::Result<()> {
            debug!(bundler = %stage.name, entries = stage.entry_points.len(), "stage bundled");
            Ok(())
        }));

        Ok(stage)
    }
}
