// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::{NamedTempFile, TempDir};

use bundlegen::config::{load_and_validate, load_or_default};
use bundlegen::errors::PipelineError;
use bundlegen::fs::RealFileSystem;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = load_or_default(&RealFileSystem, dir.path().join("bundlegen.toml")).unwrap();

    assert_eq!(cfg.layout.config_entry, "bundlegen.config.ts");
    assert_eq!(cfg.layout.server_entry, "bundlegen.server.ts");
    assert_eq!(cfg.layout.out_dir, PathBuf::from("generated/bundle"));
    assert_eq!(cfg.bundler.cmd, "esbuild");
    assert_eq!(cfg.process.executable, "node");
}

#[test]
fn partial_sections_keep_other_defaults() {
    let file = write_config(
        r#"
[layout]
server_entry = "hooks.ts"
extensions = ["ts"]

[process]
executable = "bun"
env = { API_URL = "http://localhost:9991" }
"#,
    );

    let cfg = load_and_validate(&RealFileSystem, file.path()).unwrap();
    assert_eq!(cfg.layout.server_entry, "hooks.ts");
    assert_eq!(cfg.layout.config_entry, "bundlegen.config.ts");
    assert_eq!(cfg.layout.extensions, vec!["ts"]);
    assert_eq!(cfg.process.executable, "bun");
    assert_eq!(
        cfg.process.env.get("API_URL").map(String::as_str),
        Some("http://localhost:9991")
    );
    assert_eq!(cfg.bundler.cmd, "esbuild");
}

#[test]
fn out_dir_outside_project_is_rejected() {
    let file = write_config(
        r#"
[layout]
out_dir = "../elsewhere"
"#,
    );

    match load_and_validate(&RealFileSystem, file.path()) {
        Err(PipelineError::ConfigError(msg)) => assert!(msg.contains("out_dir"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_bundler_command_is_rejected() {
    let file = write_config(
        r#"
[bundler]
cmd = "  "
"#,
    );

    match load_and_validate(&RealFileSystem, file.path()) {
        Err(PipelineError::ConfigError(msg)) => assert!(msg.contains("[bundler].cmd")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn same_webhooks_and_operations_dir_is_rejected() {
    let file = write_config(
        r#"
[layout]
webhooks_dir = "functions"
operations_dir = "functions"
"#,
    );

    assert!(matches!(
        load_and_validate(&RealFileSystem, file.path()),
        Err(PipelineError::ConfigError(_))
    ));
}

#[test]
fn unknown_keys_are_toml_errors() {
    let file = write_config(
        r#"
[layout]
entry = "x.ts"
"#,
    );

    assert!(matches!(
        load_and_validate(&RealFileSystem, file.path()),
        Err(PipelineError::TomlError(_))
    ));
}
