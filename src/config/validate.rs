// src/config/validate.rs

use std::path::Component;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PipelineError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PipelineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.layout, raw.bundler, raw.process))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_layout(cfg)?;
    validate_commands(cfg)?;
    Ok(())
}

fn validate_layout(cfg: &RawConfigFile) -> Result<()> {
    let layout = &cfg.layout;

    for (key, value) in [
        ("config_entry", &layout.config_entry),
        ("server_entry", &layout.server_entry),
        ("webhooks_dir", &layout.webhooks_dir),
        ("operations_dir", &layout.operations_dir),
    ] {
        if value.trim().is_empty() {
            return Err(PipelineError::ConfigError(format!(
                "[layout].{key} must not be empty"
            )));
        }
    }

    if layout.config_entry == layout.server_entry {
        return Err(PipelineError::ConfigError(format!(
            "[layout].config_entry and server_entry must differ (both '{}')",
            layout.config_entry
        )));
    }

    if layout.webhooks_dir == layout.operations_dir {
        return Err(PipelineError::ConfigError(format!(
            "[layout].webhooks_dir and operations_dir must differ (both '{}')",
            layout.webhooks_dir
        )));
    }

    // Bundles are written below the project directory, never outside it.
    let escapes = layout
        .out_dir
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if layout.out_dir.as_os_str().is_empty() || escapes {
        return Err(PipelineError::ConfigError(format!(
            "[layout].out_dir must be a relative path inside the project (got {:?})",
            layout.out_dir
        )));
    }

    if layout.extensions.iter().all(|e| e.trim().is_empty()) {
        return Err(PipelineError::ConfigError(
            "[layout].extensions must contain at least one extension".to_string(),
        ));
    }

    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    if cfg.bundler.cmd.trim().is_empty() {
        return Err(PipelineError::ConfigError(
            "[bundler].cmd must not be empty".to_string(),
        ));
    }
    if cfg.process.executable.trim().is_empty() {
        return Err(PipelineError::ConfigError(
            "[process].executable must not be empty".to_string(),
        ));
    }
    if let Some(key) = cfg.process.env.keys().find(|k| k.is_empty() || k.contains('=')) {
        return Err(PipelineError::ConfigError(format!(
            "[process].env contains an invalid variable name '{key}'"
        )));
    }
    Ok(())
}
