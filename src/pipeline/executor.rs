// src/pipeline/executor.rs

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::bundle::Bundler;
use crate::errors::{PipelineError, Result};
use crate::pipeline::fan_out::run_concurrently;
use crate::plan::{PipelineStages, StageSpec};
use crate::process::SupervisedProcess;
use crate::types::{PipelineShape, StageKind};

/// Runs one pipeline invocation.
///
/// The executor owns the supervised process for its whole lifetime and is
/// consumed by [`execute`](Self::execute), so a process is started at most
/// once and always stopped before control returns to the caller.
///
/// Sequence:
/// 1. bundle the primary config stage,
/// 2. run the supervised process and wait for its completion signal,
/// 3. bundle the dependent stages concurrently (hooks, webhooks, operations).
///
/// Any failure ends the invocation; nothing is retried.
pub struct PipelineExecutor<B, P>
where
    B: Bundler + 'static,
    P: SupervisedProcess,
{
    bundler: Arc<B>,
    process: P,
}

impl<B, P> PipelineExecutor<B, P>
where
    B: Bundler + 'static,
    P: SupervisedProcess,
{
    pub fn new(bundler: Arc<B>, process: P) -> Self {
        Self { bundler, process }
    }

    pub async fn execute(mut self, shape: PipelineShape, stages: PipelineStages) -> Result<()> {
        info!(%shape, "pipeline started");

        let result = self.run_stages(shape, stages).await;

        // Runs on every return path of `run_stages`, never short-circuited.
        debug!("stopping supervised process");
        if let Err(err) = self.process.stop().await {
            error!(error = %err, "stopping supervised process failed");
        }

        match &result {
            Ok(()) => info!(%shape, "pipeline finished"),
            Err(err) => error!(%shape, error = %err, "pipeline failed"),
        }
        result
    }

    async fn run_stages(&mut self, shape: PipelineShape, stages: PipelineStages) -> Result<()> {
        let PipelineStages {
            config,
            hooks,
            webhooks,
            operations,
        } = stages;

        let dependents = select_dependents(shape, hooks, webhooks, operations)?;

        debug!(stage = %config.name, "bundling primary config");
        self.bundler.bundle(config).await?;

        self.await_process().await?;

        if dependents.is_empty() {
            debug!(bundler = %StageKind::Config, "config built");
            return Ok(());
        }

        run_concurrently(Arc::clone(&self.bundler), dependents).await?;
        debug!(bundler = %StageKind::Config, "config and dependents built");
        Ok(())
    }

    /// Run the process and block until it signals completion.
    async fn await_process(&mut self) -> Result<()> {
        let done = self.process.run();
        if done.await.is_err() {
            debug!("completion signal closed; treating process as exited");
        }

        if self.process.is_successful() {
            return Ok(());
        }
        Err(PipelineError::ProcessFailed {
            exit_code: self.process.exit_code(),
        })
    }
}

/// Pick the dependent stages the shape admits, in fixed stage order.
///
/// Checked before anything runs so that an inconsistent plan never starts
/// the process.
fn select_dependents(
    shape: PipelineShape,
    hooks: Option<StageSpec>,
    webhooks: Option<StageSpec>,
    operations: Option<StageSpec>,
) -> Result<Vec<StageSpec>> {
    let mut selected = Vec::new();

    let planned = [
        (StageKind::Hooks, hooks),
        (StageKind::Webhooks, webhooks),
        (StageKind::Operations, operations),
    ];
    for (kind, stage) in planned {
        match stage {
            Some(stage) if shape.admits(kind) => selected.push(stage),
            Some(stage) => {
                warn!(%shape, stage = %stage.name, "stage not admitted by shape; skipping");
            }
            None if shape.requires(kind) => {
                return Err(PipelineError::Plan(format!(
                    "shape {shape} requires a {kind} stage but none was planned"
                )));
            }
            None => {}
        }
    }

    Ok(selected)
}
