// src/bundle/mod.rs

//! Bundling layer.
//!
//! - [`backend`] defines the [`Bundler`] trait the executor talks to, so tests
//!   can swap in a fake bundler.
//! - [`command`] is the production bundler: it runs an external bundler
//!   command (`esbuild` by default) with `tokio::process::Command`.

pub mod backend;
pub mod command;

pub use backend::{BundleFuture, Bundler};
pub use command::CommandBundler;
