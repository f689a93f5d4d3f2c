//! Error types for lifecycle operations.

use bitcart_core::ComponentType;
use bitcart_schema::SchemaViolation;
use std::path::PathBuf;

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors raised by the lifecycle pipelines.
///
/// Every variant is fatal to the command that produced it.
#[derive(thiserror::Error, Debug)]
pub enum LifecycleError {
    /// Manifest, configuration or prompt failure.
    #[error(transparent)]
    Core(#[from] bitcart_core::Error),

    /// Schema preparation failure.
    #[error(transparent)]
    Schema(#[from] bitcart_schema::SchemaError),

    /// The manifest document does not satisfy the schema.
    #[error("manifest does not match schema: {}", join_violations(.0))]
    SchemaViolations(Vec<SchemaViolation>),

    /// A component lacks a file its host requires.
    #[error("plugin's {kind} component {} does not include {file}", component.display())]
    MissingComponentFile {
        /// Component type
        kind: ComponentType,
        /// Component directory
        component: PathBuf,
        /// Missing file, relative to the component directory
        file: String,
    },

    /// An install entry points at a directory that does not exist.
    #[error("component directory {} does not exist", path.display())]
    ComponentNotFound {
        /// Expected component directory
        path: PathBuf,
    },

    /// An install entry path has no usable final segment.
    #[error("install path {} does not name a component directory", path.display())]
    InvalidComponentPath {
        /// Offending path
        path: PathBuf,
    },

    /// A name cannot be used as a path segment.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidName {
        /// Which name (plugin name, author, component name)
        field: &'static str,
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A host path could not be turned into an absolute path.
    #[error("cannot resolve {kind} host path: {reason}")]
    HostNotResolved {
        /// Component type being resolved
        kind: ComponentType,
        /// Description of the failure
        reason: String,
    },

    /// Template registration or rendering failed.
    #[error("template error: {message}")]
    Template {
        /// Description of the failure
        message: String,
    },

    /// The archive could not be written.
    #[error("failed to write archive {}: {reason}", path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// An ignore file could not be parsed.
    #[error("invalid ignore file {}: {reason}", path.display())]
    Ignore {
        /// Path of the ignore file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// I/O error during file operations.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl LifecycleError {
    /// Returns true if the error was caused by the plugin or the operator's input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Core(e) => e.is_user_error(),
            Self::Schema(e) => e.is_user_error(),
            Self::SchemaViolations(_)
            | Self::MissingComponentFile { .. }
            | Self::ComponentNotFound { .. }
            | Self::InvalidComponentPath { .. }
            | Self::InvalidName { .. }
            | Self::Ignore { .. } => true,
            Self::HostNotResolved { .. }
            | Self::Template { .. }
            | Self::Archive { .. }
            | Self::Io(_) => false,
        }
    }
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
