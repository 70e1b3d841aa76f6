// src/plan/mod.rs

//! Pipeline planning.
//!
//! - [`planner`] inspects the project directory and decides the
//!   [`PipelineShape`](crate::types::PipelineShape).
//! - [`stage`] holds the per-stage bundling descriptions handed to the
//!   executor.

pub mod planner;
pub mod stage;

pub use planner::PipelinePlanner;
pub use stage::{AfterBundle, OutputTarget, PipelineStages, StageSpec};
