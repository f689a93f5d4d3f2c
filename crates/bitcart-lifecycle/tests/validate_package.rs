//! Validation and packaging of plugin directories.

use bitcart_lifecycle::{LifecycleError, package_plugin, validate_plugin};
use bitcart_schema::CompiledSchema;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn schema() -> CompiledSchema {
    CompiledSchema::compile(
        "v1",
        &json!({
            "type": "object",
            "required": ["name", "author", "installs"],
            "properties": {
                "name": {"type": "string"},
                "author": {"type": "string"},
                "description": {"type": "string"},
                "installs": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["path", "type"],
                        "properties": {
                            "path": {"type": "string"},
                            "type": {"enum": ["backend", "admin", "store", "docker"]}
                        }
                    }
                }
            }
        }),
    )
    .unwrap()
}

fn full_plugin() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "manifest.json",
        r#"{
            "name": "demo",
            "author": "alice",
            "description": "Demo plugin",
            "installs": [
                {"path": "src/backend/demo", "type": "backend"},
                {"path": "src/store/theme", "type": "store"},
                {"path": "src/docker/tor", "type": "docker"}
            ]
        }"#,
    );
    write(dir.path(), "src/backend/demo/plugin.py", "");
    write(dir.path(), "src/store/theme/package.json", "{}");
    write(dir.path(), "src/store/theme/index.js", "");
    fs::create_dir_all(dir.path().join("src/docker/tor")).unwrap();
    dir
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| (e.path().to_path_buf(), fs::read(e.path()).unwrap()))
        .collect()
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn test_valid_plugin() {
    let plugin = full_plugin();
    assert_eq!(validate_plugin(plugin.path(), &schema()).unwrap(), 3);
}

#[test]
fn test_schema_violations_reported_together() {
    let plugin = TempDir::new().unwrap();
    write(
        plugin.path(),
        "manifest.json",
        r#"{"name": 5, "installs": [{"path": "src", "type": "web"}]}"#,
    );

    let err = validate_plugin(plugin.path(), &schema()).unwrap_err();

    let LifecycleError::SchemaViolations(violations) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(violations.len() >= 3);
    let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"/name"));
    assert!(paths.contains(&"/installs/0/type"));
}

#[test]
fn test_backend_without_entry_point() {
    let plugin = full_plugin();
    fs::remove_file(plugin.path().join("src/backend/demo/plugin.py")).unwrap();

    let err = validate_plugin(plugin.path(), &schema()).unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::MissingComponentFile { ref file, .. } if file == "plugin.py"
    ));
}

#[test]
fn test_frontend_first_missing_file_aborts() {
    let plugin = full_plugin();
    fs::remove_file(plugin.path().join("src/store/theme/package.json")).unwrap();
    fs::remove_file(plugin.path().join("src/store/theme/index.js")).unwrap();

    let err = validate_plugin(plugin.path(), &schema()).unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::MissingComponentFile { ref file, .. } if file == "package.json"
    ));
}

#[test]
fn test_missing_manifest() {
    let plugin = TempDir::new().unwrap();
    let err = validate_plugin(plugin.path(), &schema()).unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Core(bitcart_core::Error::ManifestRead { .. })
    ));
}

#[test]
fn test_package_strips_ignored_directory() {
    let plugin = full_plugin();
    write(plugin.path(), ".gitignore", "build/\n");
    write(plugin.path(), "src/store/theme/build/bundle.js", "minified");
    write(plugin.path(), "src/store/theme/build/assets/logo.svg", "<svg/>");

    let report = package_plugin(plugin.path(), true).unwrap();

    assert_eq!(report.archive, plugin.path().join("demo.bitcart"));
    assert_eq!(report.stripped, [plugin.path().join("src/store/theme/build")]);
    assert!(!plugin.path().join("src/store/theme/build").exists());
    assert!(plugin.path().join("src/store/theme/index.js").is_file());

    let names = archive_names(&report.archive);
    assert!(names.contains(&"manifest.json".to_string()));
    assert!(names.contains(&"src/store/theme/index.js".to_string()));
    assert!(names.contains(&"src/docker/tor/".to_string()));
    assert!(!names.iter().any(|n| n.contains("build")));
    assert!(!names.iter().any(|n| n.ends_with(".bitcart")));
}

#[test]
fn test_package_without_strip_leaves_tree_untouched() {
    let plugin = full_plugin();
    write(plugin.path(), ".gitignore", "build/\n");
    write(plugin.path(), "src/store/theme/build/bundle.js", "minified");
    let before = snapshot(plugin.path());

    let report = package_plugin(plugin.path(), false).unwrap();

    let mut after = snapshot(plugin.path());
    after.remove(&report.archive);
    assert_eq!(before, after);
    assert!(report.stripped.is_empty());
    assert!(
        archive_names(&report.archive).contains(&"src/store/theme/build/bundle.js".to_string())
    );
}

#[test]
fn test_repackage_replaces_archive() {
    let plugin = full_plugin();

    let first = package_plugin(plugin.path(), false).unwrap();
    let second = package_plugin(plugin.path(), false).unwrap();

    assert_eq!(first.archive, second.archive);
    let names = archive_names(&second.archive);
    assert!(!names.iter().any(|n| n.ends_with(".bitcart")));
}

#[test]
fn test_package_rejects_unsafe_name() {
    let plugin = TempDir::new().unwrap();
    write(
        plugin.path(),
        "manifest.json",
        r#"{"name":"../escape","author":"alice","installs":[]}"#,
    );

    let err = package_plugin(plugin.path(), false).unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidName { .. }));
}

#[test]
fn test_validate_rejects_parent_directory_author() {
    let plugin = full_plugin();
    write(
        plugin.path(),
        "manifest.json",
        r#"{"name":"demo","author":"..","installs":[{"path":"src/backend/demo","type":"backend"}]}"#,
    );

    let err = validate_plugin(plugin.path(), &schema()).unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidName {
            field: "author",
            ..
        }
    ));
}
