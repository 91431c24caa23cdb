// src/config.rs
// =============================================================================
// Configuration for a documentation crawl.
//
// Where settings come from (later wins):
// 1. Built-in defaults
// 2. A JSON config file (--config docs-fetcher.json), camelCase keys
// 3. Command-line flags
//
// Example config file:
//   {
//     "baseUrl": "https://docs.rs/serde/latest/serde",
//     "startPaths": ["/", "/de"],
//     "limit": 40,
//     "maxDepth": 2,
//     "delay": 750
//   }
//
// FetchConfig is the raw, serde-friendly shape. settings() validates it and
// produces CrawlSettings, which is what the rest of the program uses.
//
// Rust concepts:
// - #[serde(default)]: missing keys fall back to Default::default()
// - #[serde(flatten)]: nested struct whose keys live at the top level
// =============================================================================

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_DIR: &str = ".docs-cache";
pub const DEFAULT_PACKAGE_DOCS_FILE: &str = "package-docs.json";

/// Everything a crawl can be configured with, as it appears in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    /// Root URL of the documentation site
    pub base_url: Option<String>,
    /// Hosts we may crawl (subdomains included); defaults to the base host
    pub allowed_domains: Vec<String>,
    /// Where to start, relative to base_url; defaults to ["/"]
    pub start_paths: Vec<String>,
    /// Maximum number of pages to fetch in one run
    pub limit: usize,
    /// Maximum number of links to follow away from a start path
    pub max_depth: usize,
    /// Milliseconds between two fetches of the same host
    pub delay: u64,
    /// Number of concurrent fetch workers
    pub workers: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Output directory for fetched pages
    pub cache_dir: PathBuf,
    /// File name (inside cache_dir) of the generated catalog
    pub package_docs_file: String,
    #[serde(flatten)]
    pub packages: PackageDiscovery,
}

/// Settings for the tooling that decides *which* packages get crawled.
///
/// They are parsed and carried so one config file can serve both, but the
/// crawler itself only ever works on one base URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageDiscovery {
    pub root_dir: Option<PathBuf>,
    pub scan_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub exclude_packages: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub include_packages: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            allowed_domains: Vec::new(),
            start_paths: Vec::new(),
            limit: DEFAULT_LIMIT,
            max_depth: DEFAULT_MAX_DEPTH,
            delay: DEFAULT_DELAY_MS,
            workers: 1,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            package_docs_file: DEFAULT_PACKAGE_DOCS_FILE.to_string(),
            packages: PackageDiscovery::default(),
        }
    }
}

/// Command-line values that replace whatever the file said.
///
/// None / empty means "keep the file value".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub allowed_domains: Vec<String>,
    pub start_paths: Vec<String>,
    pub limit: Option<usize>,
    pub max_depth: Option<usize>,
    pub delay: Option<u64>,
    pub workers: Option<usize>,
    pub cache_dir: Option<PathBuf>,
}

/// Validated settings for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub base: Url,
    pub allowed_domains: Vec<String>,
    pub start_paths: Vec<String>,
    pub limit: usize,
    pub max_depth: usize,
    pub delay: Duration,
    pub workers: usize,
    pub timeout: Duration,
    pub cache_dir: PathBuf,
    pub package_docs_file: String,
}

impl FetchConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Applies command-line overrides on top of this config.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = Some(base_url);
        }
        if !overrides.allowed_domains.is_empty() {
            self.allowed_domains = overrides.allowed_domains;
        }
        if !overrides.start_paths.is_empty() {
            self.start_paths = overrides.start_paths;
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(delay) = overrides.delay {
            self.delay = delay;
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if let Some(cache_dir) = overrides.cache_dir {
            self.cache_dir = cache_dir;
        }
    }

    /// Validates the config and fills in derived defaults.
    pub fn settings(&self) -> Result<CrawlSettings, ConfigError> {
        let base = parse_base_url(self.base_url.as_deref().ok_or(ConfigError::MissingBaseUrl)?)?;

        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        let allowed_domains = if self.allowed_domains.is_empty() {
            // parse_base_url already rejected host-less URLs
            base.host_str().map(|h| vec![h.to_string()]).unwrap_or_default()
        } else {
            self.allowed_domains.clone()
        };

        let start_paths = if self.start_paths.is_empty() {
            vec!["/".to_string()]
        } else {
            self.start_paths.clone()
        };

        Ok(CrawlSettings {
            base,
            allowed_domains,
            start_paths,
            limit: self.limit,
            max_depth: self.max_depth,
            delay: Duration::from_millis(self.delay),
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout_secs),
            cache_dir: self.cache_dir.clone(),
            package_docs_file: self.package_docs_file.clone(),
        })
    }
}

// Parses the base URL and drops its query and fragment
//
// Parameters:
//   raw: the base URL as typed by the user or found in the config file
//
// Returns: the parsed URL, or an error if it is not an http(s) URL
//
// Example:
//   raw = "https://example.com/docs?v=2#top"
//   result = "https://example.com/docs"
//
// http and https URLs always have a host: Url::parse rejects "http://"
// with EmptyHost, so there is no separate host check.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut base = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(base.scheme().to_string()));
    }

    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_file() {
        let config = FetchConfig::from_json(
            r#"{
                "baseUrl": "https://example.com/docs",
                "allowedDomains": ["example.com", "cdn.example.org"],
                "startPaths": ["/", "/guide"],
                "limit": 20,
                "maxDepth": 2,
                "delay": 250,
                "cacheDir": "out",
                "packageDocsFile": "catalog.json",
                "rootDir": "/repo",
                "scanPaths": ["apps/*"],
                "excludePackages": ["left-pad"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://example.com/docs"));
        assert_eq!(config.start_paths, vec!["/", "/guide"]);
        assert_eq!(config.limit, 20);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.delay, 250);
        assert_eq!(config.workers, 1);
        assert_eq!(config.cache_dir, PathBuf::from("out"));
        assert_eq!(config.packages.root_dir, Some(PathBuf::from("/repo")));
        assert_eq!(config.packages.scan_paths, vec!["apps/*"]);
        assert_eq!(config.packages.exclude_packages, vec!["left-pad"]);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = FetchConfig::from_json(r#"{"baseUrl": "https://example.com/docs"}"#).unwrap();
        let settings = config.settings().unwrap();

        assert_eq!(settings.allowed_domains, vec!["example.com"]);
        assert_eq!(settings.start_paths, vec!["/"]);
        assert_eq!(settings.limit, DEFAULT_LIMIT);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.delay, Duration::from_millis(DEFAULT_DELAY_MS));
        assert_eq!(settings.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(settings.package_docs_file, DEFAULT_PACKAGE_DOCS_FILE);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = FetchConfig::from_json(
            r#"{"baseUrl": "https://example.com/docs", "limit": 5, "startPaths": ["/a"]}"#,
        )
        .unwrap();
        config.apply(ConfigOverrides {
            limit: Some(9),
            workers: Some(4),
            start_paths: vec!["/b".to_string()],
            ..ConfigOverrides::default()
        });

        let settings = config.settings().unwrap();
        assert_eq!(settings.limit, 9);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.start_paths, vec!["/b"]);
    }

    #[test]
    fn test_validation_errors() {
        let missing = FetchConfig::default();
        assert!(matches!(missing.settings(), Err(ConfigError::MissingBaseUrl)));

        let bad = FetchConfig {
            base_url: Some("not a url".to_string()),
            ..FetchConfig::default()
        };
        assert!(matches!(bad.settings(), Err(ConfigError::InvalidBaseUrl { .. })));

        let ftp = FetchConfig {
            base_url: Some("ftp://example.com/docs".to_string()),
            ..FetchConfig::default()
        };
        assert!(matches!(ftp.settings(), Err(ConfigError::UnsupportedScheme(_))));

        let zero = FetchConfig {
            base_url: Some("https://example.com".to_string()),
            limit: 0,
            ..FetchConfig::default()
        };
        assert!(matches!(zero.settings(), Err(ConfigError::ZeroLimit)));
    }

    #[test]
    fn test_base_url_loses_query_and_fragment() {
        let base = parse_base_url("https://example.com/docs?v=2#top").unwrap();
        assert_eq!(base.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_host_less_base_url_is_invalid() {
        assert!(matches!(
            parse_base_url("http://"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FetchConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
