//! Plugin lifecycle engine for Bitcart.
//!
//! A plugin is a directory with a `manifest.json` mapping component
//! sub-directories to host repositories (backend, admin, store, docker).
//! This crate installs those components into the hosts, removes them again,
//! validates plugins, packages them into `.bitcart` archives and scaffolds
//! new ones.
//!
//! # Examples
//!
//! ```no_run
//! use bitcart_core::{ConfigStore, ScriptedPrompter};
//! use bitcart_lifecycle::{HostRegistry, InstallMode, Installer, install_plugin};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::new()?;
//! let prompter = ScriptedPrompter::default();
//! let mut registry = HostRegistry::new(store.load_hosts()?, &prompter);
//!
//! let outcomes = install_plugin(
//!     Path::new("./demo"),
//!     &mut registry,
//!     &Installer::new(),
//!     InstallMode::Copy,
//!     None,
//! )?;
//! println!("installed {} components", outcomes.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod installer;
pub mod packaging;
mod pipeline;
mod planner;
mod registry;
mod scaffold;
pub mod templates;

pub use error::{LifecycleError, Result};
pub use installer::{InstallMode, Installer, NamespacePolicy, Outcome};
pub use packaging::{PACKAGE_EXTENSION, PackageReport, package_plugin};
pub use pipeline::{
    BACKEND_REQUIRED_FILES, FRONTEND_REQUIRED_FILES, install_plugin, required_files,
    uninstall_plugin, validate_plugin,
};
pub use planner::{PlannedComponent, plan};
pub use registry::{HostRegistry, HostShape, RequiredEntries};
pub use scaffold::{ScaffoldReport, scaffold_plugin};
