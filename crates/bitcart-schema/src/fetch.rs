//! Schema download.

use crate::error::{Result, SchemaError};
use reqwest::Url;
use tracing::debug;

/// User agent sent with schema requests.
pub const USER_AGENT: &str = concat!("bitcart-cli/", env!("CARGO_PKG_VERSION"));

/// Source of schema documents.
pub trait SchemaFetcher {
    /// Downloads the raw schema bytes at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Fetch`] or [`SchemaError::HttpStatus`] on failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher.
///
/// There is no request timeout: a hung server blocks the command.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the CLI user agent.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Fetch`] if the HTTP client cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| SchemaError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl SchemaFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let fetch_err = |e: reqwest::Error| SchemaError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SchemaError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(fetch_err)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Derives the schema version from a schema URL.
///
/// The version is the second-to-last path segment:
/// `https://bitcart.ai/schemas/plugin/v2/plugin.schema.json` is version `v2`.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedUrl`] if `url` is not an absolute URL
/// or its path has fewer than two segments.
///
/// # Examples
///
/// ```
/// use bitcart_schema::parse_schema_version;
///
/// let version = parse_schema_version("https://bitcart.ai/schemas/plugin/v2/plugin.schema.json")?;
/// assert_eq!(version, "v2");
///
/// assert!(parse_schema_version("https://bitcart.ai/plugin.schema.json").is_err());
/// # Ok::<(), bitcart_schema::SchemaError>(())
/// ```
pub fn parse_schema_version(url: &str) -> Result<String> {
    let unsupported = || SchemaError::UnsupportedUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| unsupported())?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [.., version, _file] => Ok((*version).to_string()),
        _ => Err(unsupported()),
    }
}
