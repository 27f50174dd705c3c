//! Email-Finder: contact address discovery for organization websites
//!
//! This crate crawls a bounded slice of each website in a batch, extracts the
//! publicly listed email addresses (including obfuscated and `mailto:` forms),
//! and hands back one result per input row in input order.

pub mod batch;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Email-Finder operations
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in input table")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Row-level failure kinds
///
/// Fetch kinds are absorbed inside a crawl; they only surface on a row when
/// the seed page itself could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("Request timeout for {url}")]
    FetchTimeout { url: String },

    #[error("Connection error for {url}: {message}")]
    FetchConnectionError { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    FetchHttpError { url: String, status: u16 },

    #[error("Unsupported content type '{content_type}' at {url}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("Row failed: {0}")]
    RowFatal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CrawlError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSeedUrl { .. } => "invalid_seed_url",
            Self::FetchTimeout { .. } => "fetch_timeout",
            Self::FetchConnectionError { .. } => "fetch_connection_error",
            Self::FetchHttpError { .. } => "fetch_http_error",
            Self::UnsupportedContentType { .. } => "unsupported_content_type",
            Self::RowFatal(_) => "row_fatal",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type alias for Email-Finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use batch::{process, InputRow, RowResult};
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlTarget, SiteCrawler};
pub use extract::EmailExtractor;
pub use state::{CrawlPhase, RowStatus};
pub use url::{normalize_seed, Origin, UrlNormalizer};
