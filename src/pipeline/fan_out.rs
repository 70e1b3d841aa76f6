// src/pipeline/fan_out.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::bundle::Bundler;
use crate::errors::{PipelineError, Result};
use crate::plan::StageSpec;
use crate::types::StageKind;

/// Bundle every stage concurrently and wait for all of them.
///
/// Each stage runs as its own tokio task. Once all have finished, failures
/// are examined in [`StageKind`] order: the earliest failing stage is
/// returned and the others are logged. Dropping the returned future aborts
/// the stages still running.
pub async fn run_concurrently<B>(bundler: Arc<B>, stages: Vec<StageSpec>) -> Result<()>
where
    B: Bundler + 'static,
{
    if stages.is_empty() {
        return Ok(());
    }

    let launched: Vec<(StageKind, String)> =
        stages.iter().map(|s| (s.kind, s.name.clone())).collect();

    let mut set = JoinSet::new();
    for stage in stages {
        let bundler = Arc::clone(&bundler);
        let kind = stage.kind;
        debug!(stage = %stage.name, "launching dependent stage");
        set.spawn(async move { (kind, bundler.bundle(stage).await) });
    }

    let mut outcomes: BTreeMap<StageKind, Result<()>> = BTreeMap::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((kind, outcome)) => {
                outcomes.insert(kind, outcome);
            }
            // The panicking stage is identified below by its missing outcome.
            Err(e) => error!(error = %e, "dependent stage task did not complete"),
        }
    }

    for (kind, name) in launched {
        outcomes.entry(kind).or_insert_with(|| {
            Err(PipelineError::BundleFailed {
                stage: name,
                reason: "bundler task panicked or was cancelled".to_string(),
            })
        });
    }

    first_failure(outcomes)
}

/// Reduce per-stage outcomes to the failure of the earliest stage.
fn first_failure(outcomes: BTreeMap<StageKind, Result<()>>) -> Result<()> {
    let mut first: Option<PipelineError> = None;

    for (kind, outcome) in outcomes {
        let Err(err) = outcome else {
            continue;
        };
        if first.is_none() {
            first = Some(err);
        } else {
            error!(stage = %kind, error = %err, "additional dependent stage failure");
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
