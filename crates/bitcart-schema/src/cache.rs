//! On-disk schema cache.
//!
//! The cache directory holds exactly two files: the raw schema document and a
//! version marker naming the schema version it was fetched for. A cached copy
//! is reused only while it is younger than the maximum age and its marker
//! matches the version requested.

use crate::error::{Result, SchemaError};
use crate::fetch::{HttpFetcher, SchemaFetcher, parse_schema_version};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Name of the cached schema document.
pub const SCHEMA_FILE: &str = "plugin.schema.json";

/// Name of the version marker file.
pub const VERSION_FILE: &str = "schema.version";

/// Cached schemas older than this are refetched.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Cache for the plugin manifest schema.
///
/// # Examples
///
/// ```no_run
/// use bitcart_schema::SchemaCache;
/// use serde_json::json;
///
/// let cache = SchemaCache::new()?;
/// let schema = cache.prepare("https://bitcart.ai/schemas/plugin/v1/plugin.schema.json")?;
/// let report = schema.validate(&json!({"name": "demo", "author": "alice"}));
/// println!("{} violations", report.violations().len());
/// # Ok::<(), bitcart_schema::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct SchemaCache<F = HttpFetcher> {
    directory: PathBuf,
    fetcher: F,
    max_age: Duration,
}

impl SchemaCache<HttpFetcher> {
    /// Creates a cache under the per-user cache directory (`<cache>/bitcart-cli`).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::CacheDirectory`] if the platform has no cache
    /// directory, or [`SchemaError::Fetch`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let directory = dirs::cache_dir()
            .ok_or(SchemaError::CacheDirectory)?
            .join("bitcart-cli");
        Ok(Self::with_directory(directory, HttpFetcher::new()?))
    }
}

impl<F: SchemaFetcher> SchemaCache<F> {
    /// Creates a cache in `directory` backed by `fetcher`.
    ///
    /// The directory is created on the first fetch.
    pub fn with_directory(directory: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            directory: directory.into(),
            fetcher,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Overrides the maximum age of a cached schema.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the underlying fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn schema_path(&self) -> PathBuf {
        self.directory.join(SCHEMA_FILE)
    }

    fn version_path(&self) -> PathBuf {
        self.directory.join(VERSION_FILE)
    }

    /// Returns true if the cached copy cannot serve `version`.
    ///
    /// A missing schema file, a missing or different version marker, or a
    /// schema file at least as old as the maximum age all require a refetch.
    #[must_use]
    pub fn needs_refresh(&self, version: &str) -> bool {
        let Ok(metadata) = fs::metadata(self.schema_path()) else {
            return true;
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .unwrap_or_default();
        if age >= self.max_age {
            debug!("Cached schema is {:?} old, refreshing", age);
            return true;
        }

        match fs::read_to_string(self.version_path()) {
            Ok(cached) if cached.trim() == version => false,
            Ok(cached) => {
                debug!(
                    "Cached schema version {} differs from {}",
                    cached.trim(),
                    version
                );
                true
            }
            Err(_) => true,
        }
    }

    /// Returns the compiled schema for `url`, fetching it if the cache is stale.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedUrl`] for URLs without a version
    /// segment, fetch errors from the fetcher, [`SchemaError::InvalidSchema`]
    /// if the document is not a valid JSON Schema, or [`SchemaError::Io`] if
    /// the cache cannot be read or written.
    pub fn prepare(&self, url: &str) -> Result<CompiledSchema> {
        let version = parse_schema_version(url)?;

        if !self.needs_refresh(&version) {
            debug!("Using cached schema {}", version);
            let document = parse_document(&fs::read(self.schema_path())?)?;
            return CompiledSchema::compile(version, &document);
        }

        info!("Downloading plugin schema {} from {}", version, url);
        let bytes = self.fetcher.fetch(url)?;
        let schema = CompiledSchema::compile(version, &parse_document(&bytes)?)?;

        // Only a schema that compiled is allowed into the cache.
        fs::create_dir_all(&self.directory)?;
        fs::write(self.schema_path(), &bytes)?;
        fs::write(self.version_path(), schema.version())?;
        debug!("Cached schema at {}", self.schema_path().display());
        Ok(schema)
    }
}

fn parse_document(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| SchemaError::InvalidSchema {
        reason: e.to_string(),
    })
}

/// A schema ready to validate manifest documents.
pub struct CompiledSchema {
    version: String,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    /// Compiles a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if `document` is not a valid JSON Schema.
    pub fn compile(version: impl Into<String>, document: &Value) -> Result<Self> {
        let validator =
            jsonschema::validator_for(document).map_err(|e| SchemaError::InvalidSchema {
                reason: e.to_string(),
            })?;
        Ok(Self {
            version: version.into(),
            validator,
        })
    }

    /// Returns the schema version this schema was fetched for.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Validates `instance`, collecting every violation in report order.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationReport {
        let violations = self
            .validator
            .iter_errors(instance)
            .map(|error| SchemaViolation {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();
        ValidationReport { violations }
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value, empty for the document root
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "(root)"
        } else {
            &self.path
        };
        write!(f, "{path}: {}", self.message)
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    /// Returns true if the document satisfied the schema.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violations in the order the validator reported them.
    #[must_use]
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Consumes the report, returning its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<SchemaViolation> {
        self.violations
    }
}
