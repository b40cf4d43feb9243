//! ccsd-scrape: an offline copy of the CCSD schedule
//!
//! This crate crawls the paginated CCSD schedule listing, extracts one record
//! per code together with the code's "unacceptable combinations", and writes
//! both result sets to CSV files.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for ccsd-scrape operations
#[derive(Debug, Error)]
pub enum CcsdError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// For callers of [`crate::url::resolve_detail_link`]; the crawl itself
    /// skips rows whose link does not resolve
    #[error("Link resolution error: {0}")]
    LinkResolution(#[from] LinkResolutionError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Network failures and non-success HTTP responses
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// A structural element the crawl depends on was missing or malformed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing element '{selector}' in {context}")]
    MissingElement {
        selector: &'static str,
        context: String,
    },

    #[error("Could not read a page count from pagination text '{text}'")]
    InvalidPageCount { text: String },

    #[error("Invalid CSS selector '{0}'")]
    Selector(&'static str),
}

/// A detail-page link could not be turned into an absolute URL
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkResolutionError {
    #[error("Row has no detail link")]
    MissingHref,

    #[error("Detail link '{href}' could not be resolved: {reason}")]
    Unresolvable { href: String, reason: String },
}

/// Result type alias for ccsd-scrape operations
pub type Result<T> = std::result::Result<T, CcsdError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlOutput};
pub use model::{CombinationRecord, CombinationRow, ListingRow, ScheduleRecord};
