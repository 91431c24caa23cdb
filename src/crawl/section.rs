// src/crawl/section.rs
// =============================================================================
// Decides which documentation section a page belongs to, and turns names
// into something safe to use as a file or directory name.
//
// A section is the first path segment below the base URL:
//
//   base = https://example.com/docs
//   https://example.com/docs                  -> "index"
//   https://example.com/docs/guide            -> "guide"
//   https://example.com/docs/guide/install    -> "guide"
//   https://example.com/api/reference         -> "api"   (outside the base)
// =============================================================================

use crate::frontier::NormalizedUrl;
use url::Url;

pub const INDEX_SECTION: &str = "index";

// Works out which section a page belongs to
//
// Parameters:
//   base: the documentation root URL
//   url: the page URL
//
// Returns: the first path segment below the base, lowercased, or "index"
// for the base page itself
pub fn section_for(base: &Url, url: &NormalizedUrl) -> String {
    let base_path = base.path().trim_end_matches('/');
    let path = url.path();

    // Only strip the base path on a segment boundary: "/docsearch" is not
    // below "/docs"
    let relative = match path.strip_prefix(base_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };

    relative
        .split('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.to_ascii_lowercase())
        .unwrap_or_else(|| INDEX_SECTION.to_string())
}

// File name stem for a page: its last path segment, slugged
pub fn page_slug(url: &NormalizedUrl) -> String {
    let last = url
        .path()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(INDEX_SECTION);

    // "intro.html" -> "intro"
    let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
    slug(stem)
}

// Lowercase ASCII letters and digits, everything else collapsed into
// single dashes
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let out = out.trim_matches('-');
    if out.is_empty() {
        INDEX_SECTION.to_string()
    } else {
        out.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::normalize;

    fn base() -> Url {
        Url::parse("https://example.com/docs").unwrap()
    }

    fn url(raw: &str) -> NormalizedUrl {
        normalize(raw, &base()).unwrap()
    }

    #[test]
    fn test_section_for() {
        assert_eq!(section_for(&base(), &url("https://example.com/docs")), "index");
        assert_eq!(section_for(&base(), &url("https://example.com/docs/guide")), "guide");
        assert_eq!(section_for(&base(), &url("https://example.com/docs/Guide/install")), "guide");
        assert_eq!(section_for(&base(), &url("https://example.com/api/reference")), "api");
        assert_eq!(section_for(&base(), &url("https://example.com/docsearch/x")), "docsearch");
        assert_eq!(section_for(&base(), &url("https://example.com")), "index");
    }

    #[test]
    fn test_section_for_root_base() {
        let root = Url::parse("https://example.com/").unwrap();
        assert_eq!(section_for(&root, &url("https://example.com/guide/a")), "guide");
        assert_eq!(section_for(&root, &url("https://example.com")), "index");
    }

    #[test]
    fn test_page_slug() {
        assert_eq!(page_slug(&url("https://example.com/docs/guide/Getting_Started")), "getting-started");
        assert_eq!(page_slug(&url("https://example.com/docs/intro.html")), "intro");
        assert_eq!(page_slug(&url("https://example.com")), "index");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Hello, World!"), "hello-world");
        assert_eq!(slug("--a--b--"), "a-b");
        assert_eq!(slug("???"), "index");
        assert_eq!(slug("v1.2"), "v1-2");
    }
}
