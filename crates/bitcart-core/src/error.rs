//! Error types shared by the plugin lifecycle crates.
//!
//! # Examples
//!
//! ```
//! use bitcart_core::{ComponentType, Error};
//!
//! let err = "frontend".parse::<ComponentType>().unwrap_err();
//! assert!(matches!(err, Error::UnknownComponentType { .. }));
//! assert!(err.is_user_error());
//! ```

use std::path::PathBuf;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading manifests, configuration, or user answers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `manifest.json` is absent, unreadable, or not valid JSON.
    #[error("failed to read manifest {}", path.display())]
    ManifestRead {
        /// Path of the manifest file
        path: PathBuf,
        /// Underlying I/O or syntax error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `manifest.json` is valid JSON but does not describe a manifest.
    ///
    /// Covers non-object documents, missing required fields and
    /// unrecognized component types.
    #[error("invalid manifest {}: {reason}", path.display())]
    ManifestDecode {
        /// Path of the manifest file
        path: PathBuf,
        /// Description of the decode failure
        reason: String,
    },

    /// A component type string is not one of backend, admin, store, docker.
    #[error("unknown component type '{value}' (expected: backend, admin, store, docker)")]
    UnknownComponentType {
        /// The rejected value
        value: String,
    },

    /// A configuration field identifier is not recognized.
    #[error("unknown configuration field: {0}")]
    UnknownConfigField(String),

    /// The configuration file could not be read or parsed.
    #[error("failed to read configuration {}: {reason}", path.display())]
    ConfigRead {
        /// Path of the configuration file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// The configuration file could not be written.
    #[error("failed to write configuration {}: {reason}", path.display())]
    ConfigWrite {
        /// Path of the configuration file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// The home directory needed for the settings root is unknown.
    #[error("cannot determine home directory for settings")]
    NoHomeDirectory,

    /// An interactive question could not be answered.
    ///
    /// Raised when the user aborts a prompt, when the terminal is not
    /// interactive, or when a scripted answer is rejected by its validator.
    #[error("prompt failed: {message}")]
    Prompt {
        /// Description of the failure
        message: String,
    },

    /// I/O error during file operations.
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error was caused by user input rather than the system.
    ///
    /// User errors are bad manifests, unknown identifiers and rejected answers;
    /// I/O failures are system errors.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ManifestDecode { .. }
                | Self::UnknownComponentType { .. }
                | Self::UnknownConfigField(_)
                | Self::Prompt { .. }
        )
    }

    pub(crate) fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }
}
