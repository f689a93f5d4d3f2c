//! Host repository resolution.
//!
//! Each component type installs into its own host checkout. The registry
//! returns the configured path for a type, or asks the operator for one and
//! checks that the answer looks like the right repository.

use crate::error::{LifecycleError, Result};
use bitcart_core::{ComponentType, ConfigStore, HostsConfig, Prompter, Question};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check that a directory is a checkout of a particular host.
pub trait HostShape {
    /// Returns the reason `path` is not an acceptable host checkout.
    ///
    /// # Errors
    ///
    /// Returns a human-readable rejection shown to the operator.
    fn check(&self, path: &Path) -> std::result::Result<(), String>;
}

/// Shape check requiring a fixed set of files and directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredEntries {
    files: Vec<String>,
    directories: Vec<String>,
}

impl RequiredEntries {
    /// Creates a check that accepts any directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a regular file relative to the checkout root.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.files.push(name.into());
        self
    }

    /// Requires a directory relative to the checkout root.
    #[must_use]
    pub fn directory(mut self, name: impl Into<String>) -> Self {
        self.directories.push(name.into());
        self
    }

    /// Builds the default check for a host.
    #[must_use]
    pub fn for_component(kind: ComponentType) -> Self {
        match kind {
            ComponentType::Backend => Self::new().file("main.py").directory("api"),
            ComponentType::Admin | ComponentType::Store => {
                Self::new().file("package.json").file("nuxt.config.js")
            }
            ComponentType::Docker => Self::new().directory("compose").file("setup.sh"),
        }
    }
}

impl HostShape for RequiredEntries {
    fn check(&self, path: &Path) -> std::result::Result<(), String> {
        if let Some(missing) = self.files.iter().find(|f| !path.join(f).is_file()) {
            return Err(format!("Not a valid repository: missing file {missing}"));
        }
        if let Some(missing) = self.directories.iter().find(|d| !path.join(d).is_dir()) {
            return Err(format!("Not a valid repository: missing directory {missing}"));
        }
        Ok(())
    }
}

fn directory_exists(answer: &str) -> std::result::Result<(), String> {
    if Path::new(answer).is_dir() {
        Ok(())
    } else {
        Err("Directory doesn't exist".to_string())
    }
}

/// Resolved host paths for one invocation.
///
/// Paths are resolved at most once per type. Answers given interactively are
/// recorded in the in-memory configuration so [`HostRegistry::persist`] can
/// save them.
pub struct HostRegistry<'p> {
    hosts: HostsConfig,
    prompter: &'p dyn Prompter,
    shapes: BTreeMap<ComponentType, Box<dyn HostShape + 'p>>,
    resolved: BTreeMap<ComponentType, PathBuf>,
}

impl<'p> HostRegistry<'p> {
    /// Creates a registry over `hosts` with the default shape checks.
    #[must_use]
    pub fn new(hosts: HostsConfig, prompter: &'p dyn Prompter) -> Self {
        let shapes = ComponentType::ALL
            .into_iter()
            .map(|kind| {
                let shape: Box<dyn HostShape + 'p> = Box::new(RequiredEntries::for_component(kind));
                (kind, shape)
            })
            .collect();
        Self {
            hosts,
            prompter,
            shapes,
            resolved: BTreeMap::new(),
        }
    }

    /// Replaces the shape check for `kind`.
    #[must_use]
    pub fn with_shape(mut self, kind: ComponentType, shape: impl HostShape + 'p) -> Self {
        self.shapes.insert(kind, Box::new(shape));
        self
    }

    /// Returns the prompter used for interactive answers.
    #[must_use]
    pub const fn prompter(&self) -> &'p dyn Prompter {
        self.prompter
    }

    /// Returns the current host configuration, including interactive answers.
    #[must_use]
    pub const fn hosts(&self) -> &HostsConfig {
        &self.hosts
    }

    /// Returns the host root for `kind`, asking the operator if it is unset.
    ///
    /// # Errors
    ///
    /// Returns a prompt error if no acceptable answer is given, or
    /// [`LifecycleError::HostNotResolved`] if the path cannot be made absolute.
    pub fn resolve(&mut self, kind: ComponentType) -> Result<PathBuf> {
        if let Some(path) = self.resolved.get(&kind) {
            return Ok(path.clone());
        }

        let path = if let Some(configured) = self.hosts.host_path(kind) {
            debug!("Using configured {} host {}", kind, configured.display());
            absolutize(kind, &configured)?
        } else {
            let answer = self.ask_host_path(kind)?;
            let path = absolutize(kind, Path::new(&answer))?;
            info!("Resolved {} host to {}", kind, path.display());
            self.hosts.set_host_path(kind, &path);
            path
        };

        self.resolved.insert(kind, path.clone());
        Ok(path)
    }

    fn ask_host_path(&self, kind: ComponentType) -> Result<String> {
        let shape = self.shapes.get(&kind);
        let question = Question::new(format!(
            "Enter the path to cloned {} repository",
            kind.display_name()
        ))
        .required()
        .validate_with(directory_exists)
        .validate_with(move |answer| shape.map_or(Ok(()), |s| s.check(Path::new(answer))));

        Ok(self.prompter.ask(&question)?)
    }

    /// Writes the host configuration to `store`.
    ///
    /// # Errors
    ///
    /// Returns a configuration write error.
    pub fn persist(&self, store: &ConfigStore) -> Result<()> {
        store.save_hosts(&self.hosts)?;
        info!("Saved host paths to {}", store.config_path().display());
        Ok(())
    }
}

impl fmt::Debug for HostRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRegistry")
            .field("hosts", &self.hosts)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

fn absolutize(kind: ComponentType, path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| LifecycleError::HostNotResolved {
        kind,
        reason: e.to_string(),
    })
}
