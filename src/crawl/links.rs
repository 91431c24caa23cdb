// src/crawl/links.rs
// =============================================================================
// Pulls links and the page title out of fetched HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Links come back as absolute URLs but are otherwise untouched: deciding
// which of them to crawl is the frontier's job (normalize + filter).
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

// Extracts every crawlable link from an HTML page
//
// Parameters:
//   html: the page content
//   page_url: where the page was fetched from (after redirects), used to
//             resolve relative links
//
// Returns: absolute http/https URLs, in document order, possibly repeated
//
// Example:
//   html = "<a href='guide'>Guide</a>"
//   page_url = "https://example.com/docs/"
//   result = ["https://example.com/docs/guide"]
pub fn extract_links(html: &str, page_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            // If the page URL is invalid, we can't resolve relative links
            warn!(page_url, error = %e, "invalid page URL, skipping link extraction");
            return links;
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);
    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(&base, href) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Returns the trimmed text of the page's <title>, if it has a non-empty one
pub fn extract_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);

    let title = document.select(&selector).next()?.text().collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

// Resolves a link (possibly relative) to an absolute http/https URL
//
// Skips in-page anchors and special protocols up front, and anything that
// resolves to a non-HTTP scheme afterwards.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_resolve_against_directory_page() {
        let html = r#"<a href="guide">Guide</a>"#;
        let links = extract_links(html, "https://example.com/docs/");
        assert_eq!(links, vec!["https://example.com/docs/guide"]);
    }

    #[test]
    fn test_skips_anchors_and_special_protocols() {
        let html = r##"
            <a href="#section">Anchor</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+123">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a href="ftp://example.com/file">FTP</a>
            <a href="">Empty</a>
        "##;
        let links = extract_links(html, "https://example.com");
        assert!(links.is_empty(), "unexpected links: {links:?}");
    }

    #[test]
    fn test_keeps_document_order() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_links(html, "https://example.com/page/");
        assert_eq!(
            links,
            vec![
                "https://rust-lang.org/",
                "https://example.com/docs",
                "https://example.com/about",
            ]
        );
    }

    #[test]
    fn test_invalid_page_url_yields_nothing() {
        let links = extract_links(r#"<a href="/docs">Docs</a>"#, "not a url");
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title>\n  Getting   Started \n</title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Getting Started"));
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }
}
