//! Installs components into host repositories and removes them again.
//!
//! A component lands at `<host>/<output directory>`, either as a copy of the
//! component tree or as a symlink back into the plugin source. Hosts with a
//! [`NamespacePolicy`] also get a marker file in the author namespace
//! directory, which is reclaimed once the last component of that author is
//! uninstalled.

use crate::error::Result;
use crate::planner::{PlannedComponent, check_segment};
use bitcart_core::ComponentType;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How a component is placed into its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Copy the component tree
    #[default]
    Copy,
    /// Symlink to the component tree (development mode)
    Link,
}

/// Namespace bookkeeping for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePolicy {
    /// Marker file created in the author namespace directory
    pub marker: String,
    /// Entry names that do not count as installed components
    pub ignorable: BTreeSet<String>,
}

impl NamespacePolicy {
    /// Python package marker, tolerating the bytecode cache.
    #[must_use]
    pub fn python_package() -> Self {
        Self {
            marker: "__init__.py".to_string(),
            ignorable: BTreeSet::from(["__pycache__".to_string()]),
        }
    }

    fn is_known(&self, name: &str) -> bool {
        name == self.marker || self.ignorable.contains(name)
    }
}

/// What an install or uninstall did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Location of the component inside the host
    pub final_path: PathBuf,
    /// Paths created, in creation order
    pub created: Vec<PathBuf>,
    /// Paths removed, in removal order
    pub removed: Vec<PathBuf>,
}

impl Outcome {
    fn new(final_path: PathBuf) -> Self {
        Self {
            final_path,
            ..Self::default()
        }
    }
}

/// Applies install and uninstall operations.
#[derive(Debug, Clone)]
pub struct Installer {
    policies: BTreeMap<ComponentType, NamespacePolicy>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            policies: BTreeMap::from([(ComponentType::Backend, NamespacePolicy::python_package())]),
        }
    }
}

impl Installer {
    /// Creates an installer with the default namespace policies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace policy for `kind`.
    #[must_use]
    pub fn with_policy(mut self, kind: ComponentType, policy: NamespacePolicy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    /// Removes the namespace policy for `kind`.
    #[must_use]
    pub fn without_policy(mut self, kind: ComponentType) -> Self {
        self.policies.remove(&kind);
        self
    }

    /// Returns the namespace policy for `kind`, if any.
    #[must_use]
    pub fn policy(&self, kind: ComponentType) -> Option<&NamespacePolicy> {
        self.policies.get(&kind)
    }

    /// Places `component` into the host at `host_root`.
    ///
    /// Anything already at the final path is removed first, so repeated
    /// installs converge on the same state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LifecycleError::InvalidName`] if `author` or the component
    /// name is not a single path segment, or an I/O error if any filesystem
    /// operation fails.
    pub fn install(
        &self,
        component: &PlannedComponent,
        host_root: &Path,
        author: &str,
        mode: InstallMode,
    ) -> Result<Outcome> {
        let final_path = final_path(component, host_root, author)?;
        let mut outcome = Outcome::new(final_path.clone());

        if let Some(policy) = self.policy(component.kind)
            && let Some(namespace) = final_path.parent()
        {
            ensure_marker(namespace, &policy.marker, &mut outcome.created)?;
        }

        if remove_entry(&final_path)? {
            outcome.removed.push(final_path.clone());
        }
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match mode {
            InstallMode::Copy => {
                let files = copy_tree(&component.path, &final_path)?;
                debug!(
                    "Copied {} files from {} to {}",
                    files,
                    component.path.display(),
                    final_path.display()
                );
            }
            InstallMode::Link => {
                let target = std::path::absolute(&component.path)?;
                symlink_dir(&target, &final_path)?;
                debug!("Linked {} -> {}", final_path.display(), target.display());
            }
        }
        outcome.created.push(final_path);

        Ok(outcome)
    }

    /// Removes `component` from the host at `host_root`.
    ///
    /// A missing final path is not an error. Namespace reclamation is best
    /// effort: failures are logged and the outcome only lists what was removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LifecycleError::InvalidName`] for unsafe names, or an I/O
    /// error if the component itself cannot be removed.
    pub fn uninstall(
        &self,
        component: &PlannedComponent,
        host_root: &Path,
        author: &str,
    ) -> Result<Outcome> {
        let final_path = final_path(component, host_root, author)?;
        let mut outcome = Outcome::new(final_path.clone());

        if remove_entry(&final_path)? {
            debug!("Removed {}", final_path.display());
            outcome.removed.push(final_path.clone());
        }

        if let Some(policy) = self.policy(component.kind)
            && let Some(namespace) = final_path.parent()
        {
            reclaim_namespace(namespace, policy, &mut outcome.removed);
        }

        Ok(outcome)
    }
}

fn final_path(component: &PlannedComponent, host_root: &Path, author: &str) -> Result<PathBuf> {
    check_segment("author", author)?;
    check_segment("component name", &component.name)?;
    Ok(host_root.join(component.kind.output_directory(author, &component.name)))
}

fn ensure_marker(namespace: &Path, marker: &str, created: &mut Vec<PathBuf>) -> Result<()> {
    if !namespace.is_dir() {
        fs::create_dir_all(namespace)?;
        created.push(namespace.to_path_buf());
    }

    let marker_path = namespace.join(marker);
    if !marker_path.exists() {
        fs::write(&marker_path, "")?;
        debug!("Created namespace marker {}", marker_path.display());
        created.push(marker_path);
    }
    Ok(())
}

/// Removes a file, symlink or directory tree. Returns false if nothing was there.
fn remove_entry(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        remove_link_or_file(path)?;
    }
    Ok(true)
}

#[cfg(windows)]
fn remove_link_or_file(path: &Path) -> io::Result<()> {
    // Directory symlinks on Windows are removed as directories.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_link_or_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Copies `src` to `dest`, returning the number of regular files copied.
fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut files = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dest)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest).map(|_| ())
}

/// Removes the marker and namespace directory once no components remain.
///
/// Any entry that is neither the marker nor ignorable leaves everything in place.
fn reclaim_namespace(namespace: &Path, policy: &NamespacePolicy, removed: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(namespace) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!("Cannot inspect namespace {}: {}", namespace.display(), e);
            return;
        }
    };

    let mut known = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot inspect namespace {}: {}", namespace.display(), e);
                return;
            }
        };
        let name = entry.file_name();
        if !name.to_str().is_some_and(|name| policy.is_known(name)) {
            debug!(
                "Namespace {} still holds {}, leaving it in place",
                namespace.display(),
                name.to_string_lossy()
            );
            return;
        }
        known.push(entry.path());
    }

    // Ignorable entries go first, the marker last.
    known.sort_by_key(|path| path.file_name().is_some_and(|name| name == policy.marker.as_str()));
    for path in known {
        match remove_entry(&path) {
            Ok(_) => removed.push(path),
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                return;
            }
        }
    }

    match fs::remove_dir(namespace) {
        Ok(()) => {
            debug!("Removed empty namespace {}", namespace.display());
            removed.push(namespace.to_path_buf());
        }
        Err(e) => warn!("Failed to remove namespace {}: {}", namespace.display(), e),
    }
}
