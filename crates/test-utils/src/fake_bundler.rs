use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bundlegen::bundle::{BundleFuture, Bundler};
use bundlegen::errors::PipelineError;
use bundlegen::plan::StageSpec;
use bundlegen::types::StageKind;

/// A fake bundler that:
/// - records every stage it was asked to bundle, with its output path
/// - fails the stages listed in `failing`
/// - optionally sleeps per stage, to shuffle completion order
#[derive(Clone, Default)]
pub struct FakeBundler {
    calls: Arc<Mutex<Vec<(StageKind, PathBuf)>>>,
    failing: HashSet<StageKind>,
    delays: HashMap<StageKind, Duration>,
}

impl FakeBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, kind: StageKind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub fn with_delay(mut self, kind: StageKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Stage kinds bundled so far, in call order.
    pub fn called(&self) -> Vec<StageKind> {
        self.calls.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }

    /// Output locations that received a bundle call.
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn was_called(&self, kind: StageKind) -> bool {
        self.called().contains(&kind)
    }
}

impl Bundler for FakeBundler {
    fn bundle(&self, stage: StageSpec) -> BundleFuture<'_> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((stage.kind, stage.output.path().to_path_buf()));

            if let Some(delay) = self.delays.get(&stage.kind) {
                tokio::time::sleep(*delay).await;
            }

            if self.failing.contains(&stage.kind) {
                return Err(PipelineError::BundleFailed {
                    stage: stage.name.clone(),
                    reason: "injected failure".to_string(),
                });
            }

            if let Some(callback) = &stage.on_after_bundle {
                callback(&stage)?;
            }
            Ok(())
        })
    }
}
