// src/frontier/filter.rs
// =============================================================================
// Decides whether a URL is worth crawling.
//
// A URL is admitted when:
// - it normalizes successfully
// - it is http/https on an allowed domain (or a subdomain of one)
// - its path looks like a documentation page (not an image, font,
//   stylesheet, script or data file, and not a blog/news/etc. section)
//
// All checks are pure and never panic. When in doubt they say "no":
// crawling a page too few is cheap, wandering off to another host is not.
// =============================================================================

use super::normalize::{normalize, NormalizedUrl};
use url::Url;

/// File extensions that are never documentation pages.
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "avif", "bmp",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // stylesheets and scripts
    "css", "js", "mjs", "cjs", "map", "wasm",
    // data files and archives
    "json", "xml", "csv", "yaml", "yml", "pdf", "zip", "gz", "tgz", "tar",
    // media
    "mp3", "mp4", "webm", "mov",
];

/// Site sections that are not documentation even on a docs host.
const NON_DOCUMENT_PREFIXES: &[&str] = &["/blog", "/news", "/community", "/download", "/changelog"];

/// Admission rules for one crawl: the base URL (for resolving relative
/// links) and the hosts we are allowed to visit.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base: Url,
    allowed_domains: Vec<String>,
}

impl UrlFilter {
    pub fn new(base: Url, allowed_domains: &[String]) -> Self {
        let allowed_domains = allowed_domains
            .iter()
            .map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        Self { base, allowed_domains }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// True if `url` is http(s) and its host is an allowed domain or a
    /// subdomain of one.
    ///
    /// Example (allowed = ["example.com"]):
    ///   "https://docs.example.com/x" -> true
    ///   "https://badexample.com/x"   -> false
    pub fn is_allowed_domain(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.host_allowed(parsed.scheme(), parsed.host_str()),
            Err(_) => false,
        }
    }

    /// True iff the URL normalizes and passes both the domain and the
    /// path check.
    pub fn is_allowed_url(&self, url: &str) -> bool {
        normalize(url, &self.base).is_some_and(|normalized| self.admits(&normalized))
    }

    /// Same as `is_allowed_url` for a URL that is already normalized.
    pub fn admits(&self, url: &NormalizedUrl) -> bool {
        self.host_allowed(url.scheme(), url.host()) && is_documentation_path(url.path())
    }

    fn host_allowed(&self, scheme: &str, host: Option<&str>) -> bool {
        if scheme != "http" && scheme != "https" {
            return false;
        }

        let Some(host) = host else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        self.allowed_domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

// Checks whether a URL path looks like a documentation page
//
// Parameters:
//   path: the path part of a URL (case does not matter)
//
// Returns: true unless the path points at a non-document file or a
// non-docs section
//
// Example:
//   "/docs/getting-started" -> true
//   "/logo.png"             -> false
//   "/blog/post-1"          -> false
pub fn is_documentation_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();

    if NON_DOCUMENT_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return false;
    }

    // Only the last segment can carry an extension ("/v1.2/guide" is fine)
    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, extension)) => !NON_DOCUMENT_EXTENSIONS.contains(&extension),
        None => true,
    }
}
