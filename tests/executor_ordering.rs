// tests/executor_ordering.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bundlegen::errors::PipelineError;
use bundlegen::pipeline::PipelineExecutor;
use bundlegen::types::{PipelineShape, StageKind};
use bundlegen_test_utils::builders::stages;
use bundlegen_test_utils::fake_bundler::FakeBundler;
use bundlegen_test_utils::fake_process::{FakeExit, FakeProcess};
use bundlegen_test_utils::{init_tracing, with_timeout};

use PipelineShape::*;

#[tokio::test]
async fn primary_bundle_failure_never_starts_process() {
    init_tracing();

    let bundler = FakeBundler::new().failing(StageKind::Config);
    let (process, tracker) = FakeProcess::succeeding();

    let result = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigAndHooks, stages(true, false, false)),
    )
    .await;

    let err = result.expect_err("pipeline should fail");
    assert_eq!(err.stage(), Some("config-bundler"));
    assert_eq!(tracker.starts(), 0);
    assert_eq!(bundler.called(), vec![StageKind::Config]);
}

#[tokio::test]
async fn process_failure_reports_exit_code_and_skips_dependents() {
    init_tracing();

    for code in [1, 137] {
        let bundler = FakeBundler::new();
        let (process, tracker) = FakeProcess::failing_with(code);

        let result = with_timeout(
            PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
                ConfigAndHooksWithWebhooksAndOperations,
                stages(true, true, true),
            ),
        )
        .await;

        match result {
            Err(PipelineError::ProcessFailed { exit_code }) => assert_eq!(exit_code, code),
            other => panic!("expected ProcessFailed({code}), got {other:?}"),
        }
        assert_eq!(tracker.starts(), 1);
        assert_eq!(bundler.called(), vec![StageKind::Config]);
    }
}

#[test]
fn process_failure_message_names_exit_code() {
    let err = PipelineError::ProcessFailed { exit_code: 137 };
    assert_eq!(
        err.to_string(),
        "configuration could not be generated. Process exit with code 137"
    );
    assert_eq!(err.exit_code(), Some(137));
}

#[tokio::test]
async fn full_shape_bundles_every_dependent_output() {
    init_tracing();

    let bundler = FakeBundler::new();
    let (process, tracker) = FakeProcess::succeeding();

    with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
            ConfigAndHooksWithWebhooksAndOperations,
            stages(true, true, true),
        ),
    )
    .await
    .expect("pipeline should succeed");

    assert_eq!(tracker.starts(), 1);
    assert_eq!(bundler.called().first(), Some(&StageKind::Config));

    let mut outputs = bundler.outputs();
    outputs.sort();
    assert_eq!(
        outputs,
        vec![
            PathBuf::from("generated/bundle/config.js"),
            PathBuf::from("generated/bundle/operations"),
            PathBuf::from("generated/bundle/server.js"),
            PathBuf::from("generated/bundle/webhooks"),
        ]
    );
}

#[tokio::test]
async fn webhooks_failure_wins_over_concurrent_operations_failure() {
    init_tracing();

    // Operations fails first in wall-clock time; the reported error must
    // still be the webhooks one.
    let bundler = FakeBundler::new()
        .failing(StageKind::Webhooks)
        .failing(StageKind::Operations)
        .with_delay(StageKind::Webhooks, Duration::from_millis(50));
    let (process, _tracker) = FakeProcess::succeeding();

    let err = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
            ConfigAndHooksWithWebhooksAndOperations,
            stages(true, true, true),
        ),
    )
    .await
    .expect_err("pipeline should fail");

    assert_eq!(err.stage(), Some("webhooks-bundler"));
    assert!(bundler.was_called(StageKind::Hooks));
    assert!(bundler.was_called(StageKind::Operations));
}

#[tokio::test]
async fn webhooks_failure_alone_fails_the_pipeline() {
    let bundler = FakeBundler::new().failing(StageKind::Webhooks);
    let (process, _tracker) = FakeProcess::succeeding();

    let err = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
            ConfigAndHooksWithWebhooksAndOperations,
            stages(true, true, true),
        ),
    )
    .await
    .expect_err("pipeline should fail");

    assert_eq!(err.stage(), Some("webhooks-bundler"));
    assert_eq!(bundler.called().len(), 4);
}

#[tokio::test]
async fn config_only_skips_dependents_after_process_success() {
    init_tracing();

    let bundler = FakeBundler::new();
    let (process, tracker) = FakeProcess::succeeding();

    with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigOnly, stages(false, false, false)),
    )
    .await
    .expect("pipeline should succeed");

    assert_eq!(tracker.starts(), 1);
    assert_eq!(bundler.called(), vec![StageKind::Config]);
}

#[tokio::test]
async fn closed_completion_signal_counts_as_exited() {
    let bundler = FakeBundler::new();
    let (process, tracker) = FakeProcess::new(FakeExit::ClosedSignal);

    with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigAndHooks, stages(true, false, false)),
    )
    .await
    .expect("pipeline should succeed");

    assert_eq!(tracker.starts(), 1);
    assert_eq!(bundler.called(), vec![StageKind::Config, StageKind::Hooks]);
}

#[tokio::test]
async fn operations_run_without_webhooks() {
    let bundler = FakeBundler::new();
    let (process, _tracker) = FakeProcess::succeeding();

    with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
            ConfigAndHooksWithWebhooksAndOperations,
            stages(true, false, true),
        ),
    )
    .await
    .expect("pipeline should succeed");

    assert!(bundler.was_called(StageKind::Operations));
    assert!(!bundler.was_called(StageKind::Webhooks));
}

#[tokio::test]
async fn stages_not_admitted_by_shape_are_skipped() {
    let bundler = FakeBundler::new();
    let (process, _tracker) = FakeProcess::succeeding();

    with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigAndHooks, stages(true, true, true)),
    )
    .await
    .expect("pipeline should succeed");

    let mut called = bundler.called();
    called.sort();
    assert_eq!(called, vec![StageKind::Config, StageKind::Hooks]);
}

#[tokio::test]
async fn shape_requiring_hooks_without_hooks_stage_is_a_plan_error() {
    let bundler = FakeBundler::new();
    let (process, tracker) = FakeProcess::succeeding();

    let result = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigAndHooks, stages(false, false, false)),
    )
    .await;

    assert!(matches!(result, Err(PipelineError::Plan(_))), "got {result:?}");
    assert!(bundler.called().is_empty());
    assert_eq!(tracker.starts(), 0);
    assert_eq!(tracker.stops(), 1);
}

#[tokio::test]
async fn webhooks_shape_without_webhooks_stage_is_a_plan_error() {
    let bundler = FakeBundler::new();
    let (process, tracker) = FakeProcess::succeeding();

    let result = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process)
            .execute(ConfigAndHooksWithWebhooks, stages(true, false, false)),
    )
    .await;

    match result {
        Err(PipelineError::Plan(msg)) => assert!(msg.contains("webhooks-bundler"), "{msg}"),
        other => panic!("expected Plan error, got {other:?}"),
    }
    assert!(bundler.called().is_empty());
    assert_eq!(tracker.starts(), 0);
}

#[tokio::test]
async fn operations_shape_without_operations_stage_is_a_plan_error() {
    let bundler = FakeBundler::new();
    let (process, _tracker) = FakeProcess::succeeding();

    let result = with_timeout(
        PipelineExecutor::new(Arc::new(bundler.clone()), process).execute(
            ConfigAndHooksWithWebhooksAndOperations,
            stages(true, true, false),
        ),
    )
    .await;

    assert!(matches!(result, Err(PipelineError::Plan(_))), "got {result:?}");
    assert!(bundler.called().is_empty());
}
