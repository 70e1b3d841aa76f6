// src/process/env.rs

use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable carrying the log level into spawned scripts.
pub const LOG_ENV_KEY: &str = "BUNDLEGEN_LOG";

/// Environment variable pointing spawned scripts back at this binary.
pub const BINARY_PATH_ENV_KEY: &str = "BUNDLEGEN_BINARY_PATH";

/// Ordered environment for the supervised script.
///
/// Later `set` calls override earlier ones, so user-supplied variables are
/// applied last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: Vec<(String, String)>,
}

impl ProcessEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Production-mode variables for generating the config.
    pub fn production(project_dir: &Path, no_cache: bool, offline: bool) -> Self {
        let mut env = Self::new();
        env.set("NODE_ENV", "production");
        env.set("BUNDLEGEN_THROW_ON_OPERATION_LOADING_ERROR", "true");
        env.set(
            "BUNDLEGEN_ENABLE_INTROSPECTION_CACHE",
            (!no_cache).to_string(),
        );
        env.set("BUNDLEGEN_ENABLE_INTROSPECTION_OFFLINE", offline.to_string());
        env.set("BUNDLEGEN_DIR_ABS", project_dir.display().to_string());
        if let Ok(exe) = std::env::current_exe() {
            env.set(BINARY_PATH_ENV_KEY, exe.display().to_string());
        }
        env
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.vars.push((key, value)),
        }
        self
    }

    pub fn extend(&mut self, extra: &BTreeMap<String, String>) -> &mut Self {
        for (k, v) in extra {
            self.set(k.clone(), v.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
