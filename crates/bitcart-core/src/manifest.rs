//! Plugin manifest model.
//!
//! A plugin root contains a `manifest.json` describing the plugin and the
//! sub-directories that map to each host repository:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "author": "alice",
//!   "description": "Demo plugin",
//!   "installs": [
//!     { "path": "src/backend/demo", "type": "backend" }
//!   ]
//! }
//! ```
//!
//! Loading performs a typed decode only. Schema correctness is checked
//! separately, against the raw document returned by
//! [`Manifest::read_document`].

use crate::component::ComponentType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the manifest inside a plugin root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One (path, component type) pair inside a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallEntry {
    /// Path of the component directory, relative to the plugin root
    pub path: String,

    /// Host repository the component belongs to
    #[serde(rename = "type")]
    pub kind: ComponentType,
}

/// Declarative description of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Plugin name, also the archive base name
    pub name: String,

    /// Plugin author, used for namespacing inside host repositories
    pub author: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Components in manifest order
    #[serde(default)]
    pub installs: Vec<InstallEntry>,
}

impl Manifest {
    /// Creates a manifest without install entries.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            description: description.into(),
            installs: Vec::new(),
        }
    }

    /// Returns the manifest path for a plugin root.
    #[must_use]
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILE)
    }

    /// Reads `manifest.json` from `root` as an untyped JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestRead`] if the file is absent, unreadable,
    /// or not syntactically valid JSON.
    pub fn read_document(root: &Path) -> Result<serde_json::Value> {
        let path = Self::path_in(root);
        let data = fs::read(&path).map_err(|e| Error::ManifestRead {
            path: path.clone(),
            source: Box::new(e),
        })?;

        serde_json::from_slice(&data).map_err(|e| Error::ManifestRead {
            path,
            source: Box::new(e),
        })
    }

    /// Decodes a JSON document into a typed manifest.
    ///
    /// `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestDecode`] if the document is not an object,
    /// lacks `name` or `author`, or names an unknown component type.
    pub fn from_document(path: &Path, document: serde_json::Value) -> Result<Self> {
        if !document.is_object() {
            return Err(Error::ManifestDecode {
                path: path.to_path_buf(),
                reason: "manifest must be a JSON object".to_string(),
            });
        }

        serde_json::from_value(document).map_err(|e| Error::ManifestDecode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads and decodes the manifest of the plugin at `root`.
    ///
    /// # Errors
    ///
    /// See [`Manifest::read_document`] and [`Manifest::from_document`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcart_core::Manifest;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// std::fs::write(
    ///     temp.path().join("manifest.json"),
    ///     r#"{"name":"demo","author":"alice","installs":[]}"#,
    /// )?;
    ///
    /// let manifest = Manifest::load(temp.path())?;
    /// assert_eq!(manifest.name, "demo");
    /// assert!(manifest.description.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(root: &Path) -> Result<Self> {
        let document = Self::read_document(root)?;
        let manifest = Self::from_document(&Self::path_in(root), document)?;
        tracing::debug!(
            "Loaded manifest for plugin '{}' ({} installs)",
            manifest.name,
            manifest.installs.len()
        );
        Ok(manifest)
    }

    /// Appends an install entry.
    pub fn push_install(&mut self, path: impl Into<String>, kind: ComponentType) {
        self.installs.push(InstallEntry {
            path: path.into(),
            kind,
        });
    }

    /// Serializes to the canonical on-disk form.
    ///
    /// Two-space indentation, fields in declaration order, trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the manifest to `root/manifest.json`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = Self::path_in(root);
        fs::write(&path, self.to_json_pretty()?)?;
        tracing::debug!("Wrote manifest: {}", path.display());
        Ok(path)
    }
}
