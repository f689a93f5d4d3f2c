//! Core types, configuration and errors for the Bitcart plugin tooling.
//!
//! This crate holds everything the lifecycle engine and the CLI share:
//! - [`ComponentType`] and the host output convention
//! - [`Manifest`] / [`InstallEntry`], the typed `manifest.json`
//! - [`config`]: persisted host paths, environment overrides, update check state
//! - [`prompt`]: the interactive question capability
//! - [`Error`] and [`Result`]

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
mod component;
pub mod config;
mod error;
mod manifest;
pub mod prompt;

pub use component::ComponentType;
pub use config::{ConfigStore, HostField, HostsConfig, UpdateCheckState};
pub use error::{Error, Result};
pub use manifest::{InstallEntry, MANIFEST_FILE, Manifest};
pub use prompt::{Prompter, Question, ScriptedPrompter};
