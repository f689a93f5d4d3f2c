//! Error types for schema cache operations.

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while preparing a manifest schema.
///
/// All of them are fatal to the calling command.
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    /// The URL does not follow the `<base>/<version>/plugin.schema.json` layout.
    #[error("invalid schema URL '{url}': only host-published schema URLs are supported")]
    UnsupportedUrl {
        /// The rejected URL
        url: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("failed to fetch schema from {url}: {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Transport error description
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("failed to fetch schema from {url}: HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The schema document is not JSON or not a valid JSON Schema.
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// Parse or compile error description
        reason: String,
    },

    /// No per-user cache directory exists on this platform.
    #[error("cannot determine cache directory")]
    CacheDirectory,

    /// I/O error while reading or writing the cache.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Returns true if the error stems from the requested URL rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::UnsupportedUrl { .. })
    }
}
