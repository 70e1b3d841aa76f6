use std::fmt;

/// One bundling unit of the pipeline.
///
/// The derived ordering is the fixed stage order used whenever several
/// stages fail at once: the failure of the earliest kind is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Config,
    Hooks,
    Webhooks,
    Operations,
}

impl StageKind {
    /// Stages that may only run once the supervised process succeeded.
    pub const DEPENDENTS: [StageKind; 3] =
        [StageKind::Hooks, StageKind::Webhooks, StageKind::Operations];

    /// Diagnostic name used in logs and errors.
    pub fn bundler_name(self) -> &'static str {
        match self {
            StageKind::Config => "config-bundler",
            StageKind::Hooks => "server-bundler",
            StageKind::Webhooks => "webhooks-bundler",
            StageKind::Operations => "operations-bundler",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bundler_name())
    }
}

/// Which optional sources exist next to the primary config entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePresence {
    pub hooks: bool,
    pub webhooks: bool,
    pub operations: bool,
}

/// The set of stages that applies to one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineShape {
    ConfigOnly,
    ConfigAndHooks,
    ConfigAndHooksWithWebhooks,
    /// Operations are bundled whenever their directory exists; webhooks may
    /// or may not be present in this shape.
    ConfigAndHooksWithWebhooksAndOperations,
}

impl PipelineShape {
    /// Decide the shape from the three presence flags.
    ///
    /// Without a hooks entry point nothing hooks-dependent is bundled, so the
    /// directory flags are ignored in that case.
    pub fn from_presence(presence: SourcePresence) -> Self {
        match presence {
            SourcePresence { hooks: false, .. } => PipelineShape::ConfigOnly,
            SourcePresence {
                operations: true, ..
            } => PipelineShape::ConfigAndHooksWithWebhooksAndOperations,
            SourcePresence { webhooks: true, .. } => PipelineShape::ConfigAndHooksWithWebhooks,
            _ => PipelineShape::ConfigAndHooks,
        }
    }

    /// Whether any stage has to run after the supervised process.
    pub fn has_dependents(self) -> bool {
        !matches!(self, PipelineShape::ConfigOnly)
    }

    /// Whether a stage of the given kind must have been planned for this shape.
    ///
    /// Webhooks are optional under the operations shape, which covers both
    /// layouts with and without a webhooks directory.
    pub fn requires(self, kind: StageKind) -> bool {
        match kind {
            StageKind::Config => true,
            StageKind::Hooks => self.has_dependents(),
            StageKind::Webhooks => matches!(self, PipelineShape::ConfigAndHooksWithWebhooks),
            StageKind::Operations => {
                matches!(self, PipelineShape::ConfigAndHooksWithWebhooksAndOperations)
            }
        }
    }

    /// Whether a stage of the given kind may run under this shape.
    pub fn admits(self, kind: StageKind) -> bool {
        match kind {
            StageKind::Config => true,
            StageKind::Hooks => self.has_dependents(),
            StageKind::Webhooks => matches!(
                self,
                PipelineShape::ConfigAndHooksWithWebhooks
                    | PipelineShape::ConfigAndHooksWithWebhooksAndOperations
            ),
            StageKind::Operations => {
                matches!(self, PipelineShape::ConfigAndHooksWithWebhooksAndOperations)
            }
        }
    }
}

impl From<SourcePresence> for PipelineShape {
    fn from(presence: SourcePresence) -> Self {
        PipelineShape::from_presence(presence)
    }
}

impl fmt::Display for PipelineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineShape::ConfigOnly => "config-only",
            PipelineShape::ConfigAndHooks => "config+hooks",
            PipelineShape::ConfigAndHooksWithWebhooks => "config+hooks+webhooks",
            PipelineShape::ConfigAndHooksWithWebhooksAndOperations => {
                "config+hooks+webhooks+operations"
            }
        };
        f.write_str(s)
    }
}
