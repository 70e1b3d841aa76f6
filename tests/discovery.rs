// tests/discovery.rs

use std::path::{Path, PathBuf};

use bundlegen::discover::{self, EntryFilter, discover_paths};
use bundlegen::errors::PipelineError;
use bundlegen::fs::RealFileSystem;
use bundlegen::fs::mock::MockFileSystem;
use tempfile::TempDir;

fn filter() -> EntryFilter {
    EntryFilter::new(
        &["ts".to_string(), ".js".to_string()],
        &["operations/generated".to_string(), "node_modules/".to_string()],
    )
    .unwrap()
}

#[test]
fn filter_matches_extensions_and_honours_ignores() {
    let f = filter();

    assert!(f.matches("operations/users/get.ts"));
    assert!(f.matches("webhooks/hook.js"));
    assert!(!f.matches("operations/users/README.md"));
    assert!(!f.matches("operations/generated/models.ts"));
    assert!(!f.matches("node_modules/pkg/index.js"));
    assert!(f.is_ignored("node_modules"));
}

#[test]
fn flat_discovery_ignores_nested_directories() {
    let fs = MockFileSystem::new();
    let root = Path::new("/p");
    fs.add_file("/p/webhooks/a.ts", "");
    fs.add_file("/p/webhooks/nested/b.ts", "");

    let found = discover_paths(&fs, root, &root.join("webhooks"), &filter(), false).unwrap();
    assert_eq!(found, vec![PathBuf::from("webhooks/a.ts")]);
}

#[test]
fn recursive_discovery_skips_ignored_subtrees() {
    let fs = MockFileSystem::new();
    let root = Path::new("/p");
    fs.add_file("/p/operations/b.ts", "");
    fs.add_file("/p/operations/users/a.js", "");
    fs.add_file("/p/operations/generated/models.ts", "");

    let found = discover_paths(&fs, root, &root.join("operations"), &filter(), true).unwrap();
    assert_eq!(
        found,
        vec![
            PathBuf::from("operations/b.ts"),
            PathBuf::from("operations/users/a.js"),
        ]
    );
}

#[test]
fn project_dir_must_exist() {
    let fs = MockFileSystem::new();
    let err = discover::find_project_dir(&fs, Path::new("/nope")).unwrap_err();
    assert!(matches!(err, PipelineError::ProjectDirNotFound(_)));
}

#[test]
fn real_filesystem_discovery_and_entry_points() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("operations/users")).unwrap();
    std::fs::write(dir.path().join("operations/users/get.ts"), "").unwrap();
    std::fs::write(dir.path().join("bundlegen.config.ts"), "").unwrap();

    let fs = RealFileSystem;
    let root = discover::find_project_dir(&fs, dir.path()).unwrap();

    let entry = discover::entry_point_exists(&fs, &root, "bundlegen.config.ts").unwrap();
    assert_eq!(entry, root.join("bundlegen.config.ts"));
    assert!(discover::entry_point_exists(&fs, &root, "bundlegen.server.ts").is_err());
    assert!(discover::directory_exists(&fs, &root.join("operations")));

    let found = discover_paths(&fs, &root, &root.join("operations"), &filter(), true).unwrap();
    assert_eq!(found, vec![PathBuf::from("operations/users/get.ts")]);
}

#[test]
fn existing_project_dir_is_canonicalized() {
    let fs = MockFileSystem::new();
    fs.add_dir("/project");

    let dir = discover::find_project_dir(&fs, Path::new("/project")).unwrap();
    assert_eq!(dir, PathBuf::from("/project"));
}
