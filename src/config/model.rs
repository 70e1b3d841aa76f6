// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [layout]
/// config_entry = "bundlegen.config.ts"
/// server_entry = "bundlegen.server.ts"
/// out_dir = "generated/bundle"
///
/// [bundler]
/// cmd = "esbuild"
///
/// [process]
/// executable = "node"
/// env = { API_URL = "http://localhost:9991" }
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub layout: LayoutSection,

    #[serde(default)]
    pub bundler: BundlerSection,

    #[serde(default)]
    pub process: ProcessSection,
}

/// Validated configuration. Only constructible through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub layout: LayoutSection,
    pub bundler: BundlerSection,
    pub process: ProcessSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        layout: LayoutSection,
        bundler: BundlerSection,
        process: ProcessSection,
    ) -> Self {
        Self {
            layout,
            bundler,
            process,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.layout, raw.bundler, raw.process)
    }
}

/// `[layout]` section: where sources live and where bundles go.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSection {
    /// Primary config entry point. Required to exist.
    #[serde(default = "default_config_entry")]
    pub config_entry: String,

    /// Server hooks entry point. Optional; enables every dependent stage.
    #[serde(default = "default_server_entry")]
    pub server_entry: String,

    #[serde(default = "default_webhooks_dir")]
    pub webhooks_dir: String,

    #[serde(default = "default_operations_dir")]
    pub operations_dir: String,

    /// Output root, relative to the project directory.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Paths (relative to the project directory) never treated as sources.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// File extensions considered entry points during discovery.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_config_entry() -> String {
    "bundlegen.config.ts".to_string()
}

fn default_server_entry() -> String {
    "bundlegen.server.ts".to_string()
}

fn default_webhooks_dir() -> String {
    "webhooks".to_string()
}

fn default_operations_dir() -> String {
    "operations".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("generated").join("bundle")
}

fn default_ignore() -> Vec<String> {
    vec!["generated".to_string(), "node_modules".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "js".to_string()]
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            config_entry: default_config_entry(),
            server_entry: default_server_entry(),
            webhooks_dir: default_webhooks_dir(),
            operations_dir: default_operations_dir(),
            out_dir: default_out_dir(),
            ignore: default_ignore(),
            extensions: default_extensions(),
        }
    }
}

/// `[bundler]` section: the external bundler command.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundlerSection {
    #[serde(default = "default_bundler_cmd")]
    pub cmd: String,

    /// Extra arguments passed before the entry points.
    #[serde(default = "default_bundler_args")]
    pub args: Vec<String>,
}

fn default_bundler_cmd() -> String {
    "esbuild".to_string()
}

fn default_bundler_args() -> Vec<String> {
    vec![
        "--bundle".to_string(),
        "--platform=node".to_string(),
        "--format=cjs".to_string(),
        "--sourcemap".to_string(),
        "--log-level=warning".to_string(),
    ]
}

impl Default for BundlerSection {
    fn default() -> Self {
        Self {
            cmd: default_bundler_cmd(),
            args: default_bundler_args(),
        }
    }
}

/// `[process]` section: how the bundled config is executed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSection {
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Extra environment appended after the production-mode variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_executable() -> String {
    "node".to_string()
}

impl Default for ProcessSection {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            env: BTreeMap::new(),
        }
    }
}
