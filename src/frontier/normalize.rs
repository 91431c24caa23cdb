// src/frontier/normalize.rs
// =============================================================================
// URL normalization: turns any link we find into one comparable string.
//
// Rules:
// 1. Relative links are resolved against a base URL
// 2. The fragment (#...) and query string (?...) are removed
// 3. Trailing slashes are removed
//
// The url crate does the rest of the canonicalization for us: scheme and
// host are lowercased, default ports are dropped, and "." / ".." path
// segments are resolved.
//
// A URL that fails to parse is logged and dropped (None). Nothing else in
// the frontier ever sees a raw string: everything goes through
// NormalizedUrl, and the only way to build one is `normalize`.
// =============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::warn;
use url::Url;

/// A URL in canonical form: absolute, no fragment, no query, no trailing slash.
#[derive(Debug, Clone)]
pub struct NormalizedUrl {
    raw: String,
    parsed: Url,
}

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path component, always starting with `/`.
    pub fn path(&self) -> &str {
        self.parsed.path()
    }

    pub fn host(&self) -> Option<&str> {
        self.parsed.host_str()
    }

    pub fn scheme(&self) -> &str {
        self.parsed.scheme()
    }
}

// Equality, hashing and ordering only look at the canonical string.
impl PartialEq for NormalizedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NormalizedUrl {}

impl Hash for NormalizedUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl serde::Serialize for NormalizedUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

// Canonicalizes a URL, resolving it against the base when it is relative
//
// Parameters:
//   url: an absolute URL or an href as it appeared on a page
//   base: the URL relative links are resolved against
//
// Returns: Some(NormalizedUrl), or None (after logging a warning) when the
// URL cannot be parsed. Callers drop the candidate in that case.
//
// Example:
//   base = "https://example.com/docs/"
//   url  = "guide/#install"          -> "https://example.com/docs/guide"
//   url  = "https://EXAMPLE.com/a/?x" -> "https://example.com/a"
pub fn normalize(url: &str, base: &Url) -> Option<NormalizedUrl> {
    // join() handles both cases: an absolute `url` replaces the base
    // entirely, a relative one is resolved like a browser would
    let mut parsed = match base.join(url.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url, base = %base, error = %e, "dropping unparseable URL");
            return None;
        }
    };

    parsed.set_fragment(None);
    parsed.set_query(None);

    // Stripping every trailing slash (not just one) keeps normalize
    // idempotent for paths like "/docs//"
    let raw = parsed.as_str().trim_end_matches('/').to_string();

    // Re-parse so `parsed` agrees with `raw`. For "https://host" the url
    // crate puts the root slash back in the path, which is what path()
    // callers want anyway.
    match Url::parse(&raw) {
        Ok(parsed) => Some(NormalizedUrl { raw, parsed }),
        Err(e) => {
            warn!(url, error = %e, "dropping URL that does not survive normalization");
            None
        }
    }
}
