// src/frontier/visited.rs
// =============================================================================
// The set of URLs that have already been handed out for fetching.
//
// It only ever grows: once a URL is in here it can never be queued again
// for the rest of the crawl run.
// =============================================================================

use super::normalize::NormalizedUrl;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<NormalizedUrl>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as visited. Returns false if it already was.
    pub fn mark(&mut self, url: NormalizedUrl) -> bool {
        self.urls.insert(url)
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::normalize::normalize;
    use url::Url;

    #[test]
    fn test_mark_is_idempotent() {
        let base = Url::parse("https://example.com").unwrap();
        let url = normalize("/docs/a", &base).unwrap();

        let mut visited = VisitedSet::new();
        assert!(visited.mark(url.clone()));
        assert!(!visited.mark(url.clone()));
        assert!(visited.contains(&url));
        assert_eq!(visited.len(), 1);
    }
}
