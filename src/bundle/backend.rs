// src/bundle/backend.rs

//! Pluggable bundler abstraction.
//!
//! The executor only needs one operation per stage: bundle the stage's entry
//! points into its output location, or fail. Implementations must be
//! shareable across tasks because dependent stages are bundled concurrently.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;
use crate::plan::StageSpec;

pub type BundleFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Trait abstracting how a stage is bundled.
///
/// Production code uses [`CommandBundler`](super::CommandBundler); tests can
/// provide an implementation that records calls and injects failures.
pub trait Bundler: Send + Sync {
    /// Bundle one stage.
    ///
    /// Errors are surfaced verbatim as the pipeline result, so they should
    /// name the stage (see `PipelineError::BundleFailed`).
    fn bundle(&self, stage: StageSpec) -> BundleFuture<'_>;
}

impl<B: Bundler + ?Sized> Bundler for Arc<B> {
    fn bundle(&self, stage: StageSpec) -> BundleFuture<'_> {
        (**self).bundle(stage)
    }
}
