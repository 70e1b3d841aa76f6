// src/pipeline/mod.rs

//! Orchestration core.
//!
//! [`executor`] sequences one invocation: primary bundle, supervised process,
//! then the dependent stages. [`fan_out`] runs the dependent stages
//! concurrently and reduces their outcomes to one result in fixed stage
//! order.

pub mod executor;
pub mod fan_out;

pub use executor::PipelineExecutor;
pub use fan_out::run_concurrently;
