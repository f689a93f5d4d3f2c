//! Versioned, locally cached schema for Bitcart plugin manifests.
//!
//! The schema version is read from the schema URL itself
//! (`<base>/<version>/plugin.schema.json`). [`SchemaCache::prepare`] reuses
//! the cached document while it is fresh and matches that version, and
//! downloads it otherwise.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod cache;
mod error;
mod fetch;

pub use cache::{
    CompiledSchema, DEFAULT_MAX_AGE, SCHEMA_FILE, SchemaCache, SchemaViolation, VERSION_FILE,
    ValidationReport,
};
pub use error::{Result, SchemaError};
pub use fetch::{HttpFetcher, SchemaFetcher, USER_AGENT, parse_schema_version};

/// Schema used when no `--schema` URL is given.
pub const DEFAULT_SCHEMA_URL: &str = "https://bitcart.ai/schemas/plugin/v1/plugin.schema.json";
