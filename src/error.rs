// src/error.rs
// =============================================================================
// Typed errors for every part of the fetcher that can fail.
//
// Each concern gets its own enum so callers can match on what went wrong:
// - ConfigError: reading, parsing and validating the configuration
// - FetchError: a single page fetch (network or HTTP status)
// - StoreError: writing pages and the catalog into the cache directory
// - CoordinatorError: the frontier coordinator task went away
// - CrawlError: everything that can abort a whole crawl run
//
// The frontier itself never returns errors: malformed URLs are logged and
// dropped. Only the orchestration around it can fail.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error and Display
// - #[from]: generates From impls so `?` converts errors automatically
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the configuration file or command-line overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no base URL configured (pass BASE_URL or set baseUrl in the config file)")]
    MissingBaseUrl,

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("limit must be greater than zero")]
    ZeroLimit,

    #[error("workers must be greater than zero")]
    ZeroWorkers,
}

/// A single page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Writing into the cache directory failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// The coordinator task that owns the frontier is no longer reachable.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("frontier coordinator has shut down")]
    Closed,
}

/// Anything that aborts a crawl run as a whole.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("fetch worker panicked: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
