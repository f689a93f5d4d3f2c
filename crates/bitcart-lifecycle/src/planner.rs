//! Turns manifest entries into concrete component directories.

use crate::error::{LifecycleError, Result};
use bitcart_core::cli::validate_path_segment;
use bitcart_core::{ComponentType, Manifest};
use std::path::{Path, PathBuf};

/// One component of a plugin, located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedComponent {
    /// Component directory inside the plugin tree
    pub path: PathBuf,
    /// Final segment of `path`, used in the host output path
    pub name: String,
    /// Host the component installs into
    pub kind: ComponentType,
}

impl PlannedComponent {
    /// Checks that the component directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ComponentNotFound`] if it does not.
    pub fn ensure_present(&self) -> Result<()> {
        if self.path.is_dir() {
            Ok(())
        } else {
            Err(LifecycleError::ComponentNotFound {
                path: self.path.clone(),
            })
        }
    }
}

/// Checks that `value` can be used as one path segment inside a host repository.
///
/// # Errors
///
/// Returns [`LifecycleError::InvalidName`] for `field` if it cannot.
pub fn check_segment(field: &'static str, value: &str) -> Result<()> {
    validate_path_segment(value).map_err(|reason| LifecycleError::InvalidName {
        field,
        value: value.to_string(),
        reason,
    })
}

/// Plans every install entry of `manifest`, in manifest order.
///
/// The plugin name and author become host paths, so both are checked first.
///
/// # Errors
///
/// Returns [`LifecycleError::InvalidName`] if the name or author is not a
/// single path segment, or [`LifecycleError::InvalidComponentPath`] if an
/// entry path has no
/// final segment (for example `..`) or the segment is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use bitcart_core::{ComponentType, Manifest};
/// use bitcart_lifecycle::plan;
/// use std::path::Path;
///
/// let mut manifest = Manifest::new("demo", "alice", "");
/// manifest.push_install("src/backend/demo", ComponentType::Backend);
///
/// let planned = plan(Path::new("/plugins/demo"), &manifest)?;
/// assert_eq!(planned[0].name, "demo");
/// assert_eq!(planned[0].path, Path::new("/plugins/demo/src/backend/demo"));
/// # Ok::<(), bitcart_lifecycle::LifecycleError>(())
/// ```
pub fn plan(root: &Path, manifest: &Manifest) -> Result<Vec<PlannedComponent>> {
    check_segment("plugin name", &manifest.name)?;
    check_segment("author", &manifest.author)?;

    manifest
        .installs
        .iter()
        .map(|entry| {
            let path = root.join(&entry.path);
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| LifecycleError::InvalidComponentPath { path: path.clone() })?
                .to_string();
            Ok(PlannedComponent {
                path,
                name,
                kind: entry.kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_preserves_order() {
        let mut manifest = Manifest::new("demo", "alice", "");
        manifest.push_install("src/store/theme", ComponentType::Store);
        manifest.push_install("src/backend/demo", ComponentType::Backend);
        manifest.push_install("src/docker/tor", ComponentType::Docker);

        let planned = plan(Path::new("/p"), &manifest).unwrap();
        let kinds: Vec<_> = planned.iter().map(|c| c.kind).collect();
        let names: Vec<_> = planned.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(
            kinds,
            [ComponentType::Store, ComponentType::Backend, ComponentType::Docker]
        );
        assert_eq!(names, ["theme", "demo", "tor"]);
    }

    #[test]
    fn test_trailing_separator() {
        let mut manifest = Manifest::new("demo", "alice", "");
        manifest.push_install("src/admin/panel/", ComponentType::Admin);

        let planned = plan(Path::new("/p"), &manifest).unwrap();
        assert_eq!(planned[0].name, "panel");
    }

    #[test]
    fn test_parent_reference_rejected() {
        let mut manifest = Manifest::new("demo", "alice", "");
        manifest.push_install("src/..", ComponentType::Backend);

        assert!(matches!(
            plan(Path::new("/p"), &manifest),
            Err(LifecycleError::InvalidComponentPath { .. })
        ));
    }

    #[test]
    fn test_unsafe_author_rejected() {
        for author in ["..", "a/b", "../..", "al\"ice"] {
            let mut manifest = Manifest::new("demo", author, "");
            manifest.push_install("src/backend/demo", ComponentType::Backend);

            let err = plan(Path::new("/p"), &manifest).unwrap_err();
            assert!(
                matches!(err, LifecycleError::InvalidName { field: "author", .. }),
                "{author}"
            );
        }
    }

    #[test]
    fn test_unsafe_plugin_name_rejected() {
        let manifest = Manifest::new("../escape", "alice", "");
        assert!(matches!(
            plan(Path::new("/p"), &manifest),
            Err(LifecycleError::InvalidName {
                field: "plugin name",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::new("demo", "alice", "");
        assert!(plan(Path::new("/p"), &manifest).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_present() {
        let dir = tempfile::TempDir::new().unwrap();
        let present = PlannedComponent {
            path: dir.path().to_path_buf(),
            name: "x".to_string(),
            kind: ComponentType::Docker,
        };
        assert!(present.ensure_present().is_ok());

        let missing = PlannedComponent {
            path: dir.path().join("missing"),
            ..present
        };
        assert!(matches!(
            missing.ensure_present(),
            Err(LifecycleError::ComponentNotFound { .. })
        ));
    }
}
