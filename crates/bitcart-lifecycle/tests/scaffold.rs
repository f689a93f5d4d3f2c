//! Scaffolding new plugins with scripted answers.

use bitcart_core::{ComponentType, ConfigStore, HostsConfig, Manifest, ScriptedPrompter};
use bitcart_lifecycle::{
    HostRegistry, InstallMode, Installer, install_plugin, scaffold_plugin, uninstall_plugin,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn backend_checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.py"), "").unwrap();
    fs::create_dir(dir.path().join("api")).unwrap();
    dir
}

fn store_checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    fs::write(dir.path().join("nuxt.config.js"), "").unwrap();
    dir
}

fn path_answer(dir: &Path) -> String {
    dir.to_string_lossy().into_owned()
}

#[cfg(unix)]
#[test]
fn test_scaffold_backend_and_store() {
    let workspace = TempDir::new().unwrap();
    let target = workspace.path().join("demo");
    let backend = backend_checkout();
    let store_host = store_checkout();
    let settings = TempDir::new().unwrap();
    let store = ConfigStore::with_root(settings.path().join(".bitcart-cli"));

    // Indices into ComponentType::ALL: backend = 0, store = 3.
    let prompter = ScriptedPrompter::new([
        "demo".to_string(),
        "alice".to_string(),
        "A demo plugin".to_string(),
        "demo".to_string(),
        path_answer(backend.path()),
        "theme".to_string(),
        path_answer(store_host.path()),
    ])
    .with_selection([0, 3]);
    let mut registry = HostRegistry::new(HostsConfig::default(), &prompter);

    let report = scaffold_plugin(&target, &mut registry, &Installer::new(), Some(&store)).unwrap();

    assert_eq!(prompter.remaining(), 0);
    assert_eq!(
        prompter.asked(),
        [
            "Plugin name",
            "Author",
            "Description",
            "Select components to create",
            "Enter name of your backend component (i.e. name of the subfolder)",
            "Enter the path to cloned bitcart repository",
            "Enter name of your store component (i.e. name of the subfolder)",
            "Enter the path to cloned bitcart-store repository",
        ]
    );

    let root = &report.root;
    assert!(root.join("src/backend/demo/plugin.py").is_file());
    assert!(root.join("src/backend/demo/__init__.py").is_file());
    for file in ["index.js", "package.json", "config/extends.js", "config/routes.js"] {
        assert!(root.join("src/store/theme").join(file).is_file(), "{file}");
    }
    assert!(root.join(".gitignore").is_file());
    assert!(root.join(".editorconfig").is_file());

    let package: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("src/store/theme/package.json")).unwrap())
            .unwrap();
    assert_eq!(package["name"], "@alice/theme");

    let backend_link = backend.path().join("modules/alice/demo");
    assert_eq!(
        fs::read_link(&backend_link).unwrap(),
        root.join("src/backend/demo")
    );
    assert!(backend.path().join("modules/alice/__init__.py").is_file());
    assert_eq!(
        fs::read_link(store_host.path().join("modules/@alice/theme")).unwrap(),
        root.join("src/store/theme")
    );
    assert_eq!(report.links.len(), 2);

    let saved = store.load_hosts().unwrap();
    assert_eq!(
        saved.host_path(ComponentType::Store).as_deref(),
        Some(store_host.path())
    );
}

#[cfg(unix)]
#[test]
fn test_manifest_round_trip() {
    let workspace = TempDir::new().unwrap();
    let docker = TempDir::new().unwrap();
    let mut hosts = HostsConfig::default();
    hosts.set_host_path(ComponentType::Docker, docker.path());

    let prompter = ScriptedPrompter::new(["tor-relay", "o'neil", "", "tor"]).with_selection([1]);
    let mut registry = HostRegistry::new(hosts, &prompter);

    let report =
        scaffold_plugin(workspace.path(), &mut registry, &Installer::new(), None).unwrap();

    let loaded = Manifest::load(&report.root).unwrap();
    assert_eq!(loaded, report.manifest);
    assert_eq!(
        fs::read_to_string(report.root.join("manifest.json")).unwrap(),
        loaded.to_json_pretty().unwrap()
    );
    assert_eq!(loaded.installs[0].path, "src/docker/tor");
    assert!(loaded.description.is_empty());
    assert!(report.root.join("src/docker/tor").is_dir());
    assert_eq!(fs::read_dir(report.root.join("src/docker/tor")).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_scaffolded_plugin_installs_and_uninstalls_cleanly() {
    let workspace = TempDir::new().unwrap();
    let backend = backend_checkout();
    let mut hosts = HostsConfig::default();
    hosts.set_host_path(ComponentType::Backend, backend.path());

    let prompter = ScriptedPrompter::new(["demo", "alice", "", "demo"]).with_selection([0]);
    let mut registry = HostRegistry::new(hosts, &prompter);
    let installer = Installer::new();

    let report = scaffold_plugin(workspace.path(), &mut registry, &installer, None).unwrap();
    install_plugin(&report.root, &mut registry, &installer, InstallMode::Copy, None).unwrap();

    let namespace = backend.path().join("modules/alice");
    assert!(
        fs::symlink_metadata(namespace.join("demo"))
            .unwrap()
            .is_dir()
    );

    uninstall_plugin(&report.root, &mut registry, &installer, None).unwrap();
    assert!(!namespace.exists());
    assert!(report.root.join("src/backend/demo/plugin.py").is_file());
}

#[test]
fn test_rejects_path_like_names() {
    let workspace = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::new(["../evil"]);
    let mut registry = HostRegistry::new(HostsConfig::default(), &prompter);

    let err = scaffold_plugin(workspace.path(), &mut registry, &Installer::new(), None)
        .unwrap_err();

    assert!(err.to_string().contains("path separators"));
    assert!(!workspace.path().join("manifest.json").exists());
}

#[test]
fn test_rejects_quoted_author() {
    let workspace = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::new(["demo", "al\"ice"]);
    let mut registry = HostRegistry::new(HostsConfig::default(), &prompter);

    let err = scaffold_plugin(workspace.path(), &mut registry, &Installer::new(), None)
        .unwrap_err();

    assert!(err.to_string().contains("double quotes"));
    assert_eq!(fs::read_dir(workspace.path()).unwrap().count(), 0);
}
