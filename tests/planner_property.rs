// tests/planner_property.rs

use proptest::prelude::*;

use bundlegen::plan::PipelinePlanner;
use bundlegen::types::{PipelineShape, SourcePresence, StageKind};
use bundlegen_test_utils::builders::ProjectBuilder;

fn expected_shape(hooks: bool, webhooks: bool, operations: bool) -> PipelineShape {
    match (hooks, webhooks, operations) {
        (false, _, _) => PipelineShape::ConfigOnly,
        (true, _, true) => PipelineShape::ConfigAndHooksWithWebhooksAndOperations,
        (true, true, false) => PipelineShape::ConfigAndHooksWithWebhooks,
        (true, false, false) => PipelineShape::ConfigAndHooks,
    }
}

proptest! {
    /// The shape only depends on the three presence flags; unrelated files
    /// in the project never change it.
    #[test]
    fn shape_depends_only_on_presence(
        hooks in any::<bool>(),
        webhooks in any::<bool>(),
        operations in any::<bool>(),
        noise in proptest::collection::vec("[a-z]{1,8}\\.(ts|js|md)", 0..6),
    ) {
        let mut builder = ProjectBuilder::new();
        if hooks {
            builder = builder.with_hooks();
        }
        if webhooks {
            builder = builder.with_webhooks_dir();
        }
        if operations {
            builder = builder.with_operations_dir();
        }
        for file in &noise {
            builder = builder.with_file(&format!("src/{file}"));
        }
        let (fs, root, cfg) = builder.build();
        let planner = PipelinePlanner::new(&fs, &cfg.layout);

        let presence = planner.detect(&root).unwrap();
        prop_assert_eq!(presence, SourcePresence { hooks, webhooks, operations });
        prop_assert_eq!(
            planner.plan(&root).unwrap(),
            expected_shape(hooks, webhooks, operations)
        );

        let stages = planner.stages(&root, presence).unwrap();
        prop_assert_eq!(stages.hooks.is_some(), hooks);
        prop_assert_eq!(stages.webhooks.is_some(), hooks && webhooks);
        prop_assert_eq!(stages.operations.is_some(), hooks && operations);

        let shape: PipelineShape = presence.into();
        prop_assert_eq!(shape, expected_shape(hooks, webhooks, operations));
        for stage in stages.iter() {
            prop_assert!(shape.admits(stage.kind), "{} not admitted by {}", stage.kind, shape);
        }
        prop_assert_eq!(stages.iter().next().map(|s| s.kind), Some(StageKind::Config));
    }
}
