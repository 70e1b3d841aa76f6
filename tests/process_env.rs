// tests/process_env.rs

use std::collections::BTreeMap;
use std::path::Path;

use bundlegen::process::ProcessEnv;
use bundlegen::process::env::{BINARY_PATH_ENV_KEY, LOG_ENV_KEY};

#[test]
fn production_env_sets_mode_and_introspection_flags() {
    let env = ProcessEnv::production(Path::new("/project"), false, true);

    assert_eq!(env.get("NODE_ENV"), Some("production"));
    assert_eq!(
        env.get("BUNDLEGEN_THROW_ON_OPERATION_LOADING_ERROR"),
        Some("true")
    );
    assert_eq!(env.get("BUNDLEGEN_ENABLE_INTROSPECTION_CACHE"), Some("true"));
    assert_eq!(env.get("BUNDLEGEN_ENABLE_INTROSPECTION_OFFLINE"), Some("true"));
    assert_eq!(env.get("BUNDLEGEN_DIR_ABS"), Some("/project"));
    assert!(env.get(BINARY_PATH_ENV_KEY).is_some());
}

#[test]
fn no_cache_disables_introspection_cache() {
    let env = ProcessEnv::production(Path::new("/project"), true, false);

    assert_eq!(env.get("BUNDLEGEN_ENABLE_INTROSPECTION_CACHE"), Some("false"));
    assert_eq!(env.get("BUNDLEGEN_ENABLE_INTROSPECTION_OFFLINE"), Some("false"));
}

#[test]
fn user_variables_override_in_place() {
    let mut env = ProcessEnv::production(Path::new("/project"), false, false);
    env.set(LOG_ENV_KEY, "debug");

    let mut extra = BTreeMap::new();
    extra.insert("NODE_ENV".to_string(), "staging".to_string());
    extra.insert("API_URL".to_string(), "http://localhost".to_string());
    env.extend(&extra);

    assert_eq!(env.get("NODE_ENV"), Some("staging"));
    assert_eq!(env.get(LOG_ENV_KEY), Some("debug"));
    assert_eq!(env.get("API_URL"), Some("http://localhost"));

    // Overrides keep their original position; new keys are appended.
    let keys: Vec<&str> = env.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.first(), Some(&"NODE_ENV"));
    assert_eq!(keys.last(), Some(&"API_URL"));
    assert_eq!(keys.iter().filter(|k| **k == "NODE_ENV").count(), 1);
}
