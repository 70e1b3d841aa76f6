// src/config/mod.rs

//! Configuration loading and validation for bundlegen.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to defaults (`loader.rs`).
//! - Validate basic invariants like relative output paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{BundlerSection, ConfigFile, LayoutSection, ProcessSection, RawConfigFile};
