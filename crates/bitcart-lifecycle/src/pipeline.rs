//! Command-level pipelines: load, plan, then act on every component.

use crate::error::{LifecycleError, Result};
use crate::installer::{InstallMode, Installer, Outcome};
use crate::planner::{PlannedComponent, plan};
use crate::registry::HostRegistry;
use bitcart_core::{ComponentType, ConfigStore, Manifest};
use bitcart_schema::CompiledSchema;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files a backend component must contain.
pub const BACKEND_REQUIRED_FILES: &[&str] = &["plugin.py"];

/// Files an admin or store component must contain.
pub const FRONTEND_REQUIRED_FILES: &[&str] = &["package.json", "index.js"];

struct LoadedPlugin {
    manifest: Manifest,
    components: Vec<PlannedComponent>,
}

fn load_plugin(root: &Path) -> Result<LoadedPlugin> {
    let manifest = Manifest::load(root)?;
    let components = plan(root, &manifest)?;
    for component in &components {
        component.ensure_present()?;
    }
    Ok(LoadedPlugin {
        manifest,
        components,
    })
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(root)?)
}

/// Installs every component of the plugin at `root`.
///
/// All component directories are checked before anything is changed. When
/// `persist_to` is given, host paths are saved after the last component.
///
/// # Errors
///
/// Returns the first error; components installed before it stay installed.
pub fn install_plugin(
    root: &Path,
    registry: &mut HostRegistry<'_>,
    installer: &Installer,
    mode: InstallMode,
    persist_to: Option<&ConfigStore>,
) -> Result<Vec<Outcome>> {
    let root = absolute_root(root)?;
    let plugin = load_plugin(&root)?;

    let mut outcomes = Vec::with_capacity(plugin.components.len());
    for component in &plugin.components {
        let host = registry.resolve(component.kind)?;
        let outcome = installer.install(component, &host, &plugin.manifest.author, mode)?;
        info!(
            "Installed {} component {} to {}",
            component.kind,
            component.name,
            outcome.final_path.display()
        );
        outcomes.push(outcome);
    }

    if let Some(store) = persist_to {
        registry.persist(store)?;
    }
    Ok(outcomes)
}

/// Uninstalls every component of the plugin at `root`.
///
/// # Errors
///
/// Returns the first error; components removed before it stay removed.
pub fn uninstall_plugin(
    root: &Path,
    registry: &mut HostRegistry<'_>,
    installer: &Installer,
    persist_to: Option<&ConfigStore>,
) -> Result<Vec<Outcome>> {
    let root = absolute_root(root)?;
    let plugin = load_plugin(&root)?;

    let mut outcomes = Vec::with_capacity(plugin.components.len());
    for component in &plugin.components {
        let host = registry.resolve(component.kind)?;
        let outcome = installer.uninstall(component, &host, &plugin.manifest.author)?;
        info!(
            "Uninstalled {} component {} from {}",
            component.kind,
            component.name,
            outcome.final_path.display()
        );
        outcomes.push(outcome);
    }

    if let Some(store) = persist_to {
        registry.persist(store)?;
    }
    Ok(outcomes)
}

/// Returns the files a component of `kind` must contain.
#[must_use]
pub const fn required_files(kind: ComponentType) -> &'static [&'static str] {
    match kind {
        ComponentType::Backend => BACKEND_REQUIRED_FILES,
        ComponentType::Admin | ComponentType::Store => FRONTEND_REQUIRED_FILES,
        ComponentType::Docker => &[],
    }
}

/// Validates the plugin at `root` against `schema` and the host file layout.
///
/// Returns the number of components checked.
///
/// # Errors
///
/// Returns [`LifecycleError::SchemaViolations`] with every violation, or the
/// first structural problem found ([`LifecycleError::MissingComponentFile`]).
pub fn validate_plugin(root: &Path, schema: &CompiledSchema) -> Result<usize> {
    let document = Manifest::read_document(root)?;

    let report = schema.validate(&document);
    if !report.is_valid() {
        return Err(LifecycleError::SchemaViolations(report.into_violations()));
    }

    let manifest = Manifest::from_document(&Manifest::path_in(root), document)?;
    let components = plan(root, &manifest)?;
    for component in &components {
        component.ensure_present()?;
        if let Some(missing) = required_files(component.kind)
            .iter()
            .find(|file| !component.path.join(file).is_file())
        {
            return Err(LifecycleError::MissingComponentFile {
                kind: component.kind,
                component: component.path.clone(),
                file: (*missing).to_string(),
            });
        }
    }

    info!(
        "Plugin '{}' is valid ({} components)",
        manifest.name,
        components.len()
    );
    Ok(components.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_files() {
        assert_eq!(required_files(ComponentType::Backend), ["plugin.py"]);
        assert_eq!(required_files(ComponentType::Store), ["package.json", "index.js"]);
        assert!(required_files(ComponentType::Docker).is_empty());
    }
}
