// src/frontier/queue.rs
// =============================================================================
// The crawl frontier: every URL we discovered but have not fetched yet.
//
// How it works:
// 1. The frontier is seeded with the configured start paths (depth 0)
// 2. The orchestrator takes the next URL with dequeue_next()
// 3. Links found on that page are offered back with enqueue_at(depth + 1)
// 4. Each offered link is normalized, filtered and depth-checked, and only
//    inserted if it is neither visited nor already queued
//
// Ordering:
// - Pending URLs come out sorted by path, not in discovery order
// - "/docs/guide" is followed by "/docs/guide/install" and then
//   "/docs/reference", which roughly follows how docs sites are organized
// - The ordering is hidden inside PendingQueue so it can be swapped out
//   without touching the rest of the frontier
//
// Invariants:
// - No URL is ever queued twice
// - No visited URL is ever queued (marking a queued URL visited drops it)
//
// Rust concepts:
// - BTreeMap: A sorted map, so the "first" entry is always the smallest key
// - HashSet: Fast membership checks for "already queued?"
// =============================================================================

use super::filter::UrlFilter;
use super::normalize::{normalize, NormalizedUrl};
use super::visited::VisitedSet;
use crate::config::CrawlSettings;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use url::Url;

/// A queued URL and how many links away from a start path it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: NormalizedUrl,
    pub depth: usize,
}

/// Pending entries ordered by (path, full URL).
///
/// Keyed by path first so dequeue order approximates the site hierarchy;
/// the full URL breaks ties between hosts sharing a path.
#[derive(Debug, Default)]
struct PendingQueue {
    entries: BTreeMap<(String, String), FrontierEntry>,
    members: HashSet<NormalizedUrl>,
}

impl PendingQueue {
    fn key(url: &NormalizedUrl) -> (String, String) {
        (url.path().to_string(), url.as_str().to_string())
    }

    fn contains(&self, url: &NormalizedUrl) -> bool {
        self.members.contains(url)
    }

    fn insert(&mut self, entry: FrontierEntry) {
        self.members.insert(entry.url.clone());
        self.entries.insert(Self::key(&entry.url), entry);
    }

    fn pop_first(&mut self) -> Option<FrontierEntry> {
        let (_, entry) = self.entries.pop_first()?;
        self.members.remove(&entry.url);
        Some(entry)
    }

    fn remove(&mut self, url: &NormalizedUrl) -> bool {
        if self.members.remove(url) {
            self.entries.remove(&Self::key(url));
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a finished fetch turned out to be, once redirects are accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A page not seen before: save it and follow its links
    New,
    /// Redirected to a page that was already handed out or already seen
    /// as another redirect target, so its content is (or will be) saved
    /// under that URL
    Duplicate,
    /// Redirected somewhere the crawl may not go
    OutOfScope,
}

/// Deduplicated, path-ordered queue of URLs still to fetch, together with
/// the set of URLs already handed out.
#[derive(Debug)]
pub struct Frontier {
    filter: UrlFilter,
    max_depth: usize,
    pending: PendingQueue,
    visited: VisitedSet,
}

impl Frontier {
    pub fn new(filter: UrlFilter, max_depth: usize) -> Self {
        Self {
            filter,
            max_depth,
            pending: PendingQueue::default(),
            visited: VisitedSet::new(),
        }
    }

    /// Builds a frontier for one crawl run and enqueues every start path.
    ///
    /// Start paths are resolved *under* the base URL: with base
    /// "https://example.com/docs", "/guide" becomes
    /// "https://example.com/docs/guide". Absolute start URLs are used as-is.
    pub fn seeded(settings: &CrawlSettings) -> Self {
        let filter = UrlFilter::new(settings.base.clone(), &settings.allowed_domains);
        let mut frontier = Self::new(filter, settings.max_depth);

        for path in &settings.start_paths {
            let start = resolve_start_path(&settings.base, path);
            if !frontier.enqueue(&start) {
                debug!(start_path = %path, "start path not queued");
            }
        }

        frontier
    }

    /// Offers a seed URL (depth 0). Returns true if it was queued.
    pub fn enqueue(&mut self, url: &str) -> bool {
        self.enqueue_at(url, 0)
    }

    /// Offers a URL discovered `depth` links away from a start path.
    ///
    /// The URL is dropped if it fails to normalize, is out of scope, is
    /// deeper than `max_depth`, was already visited, or is already queued.
    pub fn enqueue_at(&mut self, url: &str, depth: usize) -> bool {
        let Some(url) = normalize(url, self.filter.base()) else {
            return false;
        };

        if depth > self.max_depth {
            debug!(%url, depth, max_depth = self.max_depth, "too deep, skipping");
            return false;
        }
        if self.visited.contains(&url) || self.pending.contains(&url) {
            return false;
        }
        if !self.filter.admits(&url) {
            debug!(%url, "out of scope, skipping");
            return false;
        }

        debug!(%url, depth, "queued");
        self.pending.insert(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the first pending entry by path order.
    ///
    /// The entry is NOT marked visited; callers do that with mark_visited
    /// once they commit to fetching it.
    pub fn dequeue_next(&mut self) -> Option<FrontierEntry> {
        self.pending.pop_first()
    }

    /// Permanently excludes `url` from the frontier. Idempotent.
    pub fn mark_visited(&mut self, url: &str) {
        if let Some(url) = normalize(url, self.filter.base()) {
            self.mark_visited_url(url);
        }
    }

    pub fn mark_visited_url(&mut self, url: NormalizedUrl) {
        self.pending.remove(&url);
        self.visited.mark(url);
    }

    pub fn is_visited(&self, url: &str) -> bool {
        normalize(url, self.filter.base()).is_some_and(|url| self.visited.contains(&url))
    }

    pub fn has_pending(&self) -> bool {
        !self.is_empty()
    }

    /// Number of URLs waiting to be fetched.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Accounts for where the fetch of `requested` actually ended up.
    ///
    /// An in-scope redirect target that was never seen is marked visited so
    /// it is not fetched again. A target that was already visited, or one
    /// outside the allowed domains and documentation paths, means the
    /// fetched content must not be saved under `requested`.
    pub fn settle(&mut self, requested: &NormalizedUrl, final_url: &str) -> Completion {
        let Some(target) = normalize(final_url, self.filter.base()) else {
            return Completion::OutOfScope;
        };
        if target == *requested {
            return Completion::New;
        }
        if !self.filter.admits(&target) {
            debug!(%requested, %target, "redirected out of scope");
            return Completion::OutOfScope;
        }
        if self.is_visited(final_url) {
            debug!(%requested, %target, "redirected to a page already seen");
            return Completion::Duplicate;
        }

        debug!(%requested, %target, "marking redirect target visited");
        self.mark_visited(final_url);
        Completion::New
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

// Joins a configured start path onto the base URL.
//
// Plain Url::join would treat "/guide" as host-absolute and drop the
// base path, so relative start paths are appended textually instead.
fn resolve_start_path(base: &Url, path: &str) -> String {
    if Url::parse(path).is_ok() {
        return path.to_string();
    }

    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a BTreeMap instead of sorting a Vec after every insert?
//    - Both give the same order: smallest path first
//    - Sorting a Vec on every insert costs O(n log n) each time
//    - A BTreeMap keeps itself sorted, so each insert is O(log n)
//    - pop_first() removes the smallest key
//
// 2. Why is the key a tuple (path, url)?
//    - Tuples compare element by element, left to right
//    - So entries sort by path, and the full URL only matters on a tie
//
// 3. What is let-else?
//    - `let Some(x) = expr else { return ...; };`
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, break, continue)
//
// 4. Why keep a separate HashSet of members?
//    - The BTreeMap is keyed by (path, url), so "is this URL queued?"
//      would need us to rebuild the key every time
//    - The HashSet answers that question directly
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn frontier(max_depth: usize) -> Frontier {
        let base = Url::parse("https://example.com/docs").unwrap();
        Frontier::new(UrlFilter::new(base, &["example.com".to_string()]), max_depth)
    }

    fn settings(start_paths: &[&str]) -> CrawlSettings {
        CrawlSettings {
            base: Url::parse("https://example.com/docs").unwrap(),
            allowed_domains: vec!["example.com".to_string()],
            start_paths: start_paths.iter().map(|p| p.to_string()).collect(),
            limit: 10,
            max_depth: 3,
            delay: Duration::ZERO,
            workers: 1,
            timeout: Duration::from_secs(5),
            cache_dir: PathBuf::from(".docs-cache"),
            package_docs_file: "package-docs.json".to_string(),
        }
    }

    #[test]
    fn test_enqueue_twice_keeps_one_copy() {
        let mut frontier = frontier(3);
        assert!(frontier.enqueue("https://example.com/docs/guide"));
        assert!(!frontier.enqueue("https://example.com/docs/guide"));
        assert!(!frontier.enqueue("https://example.com/docs/guide/#top"));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_visited_url_is_not_requeued() {
        let mut frontier = frontier(3);
        frontier.mark_visited("https://example.com/docs/advanced");
        assert!(!frontier.enqueue("https://example.com/docs/advanced"));
        assert!(!frontier.has_pending());
        assert!(frontier.is_visited("https://example.com/docs/advanced/"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_marking_queued_url_removes_it() {
        let mut frontier = frontier(3);
        frontier.enqueue("https://example.com/docs/a");
        frontier.enqueue("https://example.com/docs/b");
        frontier.mark_visited("https://example.com/docs/a");

        assert_eq!(frontier.len(), 1);
        let next = frontier.dequeue_next().unwrap();
        assert_eq!(next.url.as_str(), "https://example.com/docs/b");
    }

    #[test]
    fn test_dequeue_order_is_by_path() {
        let mut frontier = frontier(3);
        frontier.enqueue("https://example.com/docs/reference");
        frontier.enqueue("https://example.com/docs/guide/install");
        frontier.enqueue("https://example.com/docs/guide");
        frontier.enqueue("https://example.com/docs");

        let order: Vec<String> = std::iter::from_fn(|| frontier.dequeue_next())
            .map(|entry| entry.url.path().to_string())
            .collect();
        assert_eq!(
            order,
            vec!["/docs", "/docs/guide", "/docs/guide/install", "/docs/reference"]
        );
    }

    #[test]
    fn test_rejects_out_of_scope_urls() {
        let mut frontier = frontier(3);
        assert!(!frontier.enqueue("https://other.com/docs"));
        assert!(!frontier.enqueue("https://example.com/logo.png"));
        assert!(!frontier.enqueue("https://example.com/blog/post-1"));
        assert!(!frontier.enqueue("http://[::1"));
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let mut frontier = frontier(1);
        assert!(frontier.enqueue_at("https://example.com/docs/one", 1));
        assert!(!frontier.enqueue_at("https://example.com/docs/two", 2));

        let entry = frontier.dequeue_next().unwrap();
        assert_eq!(entry.depth, 1);
        assert!(!frontier.has_pending());
    }

    #[test]
    fn test_is_empty_tracks_pending() {
        let mut frontier = frontier(3);
        assert!(frontier.is_empty());
        frontier.enqueue("https://example.com/docs/a");
        assert!(!frontier.is_empty());
        frontier.dequeue_next();
        assert!(frontier.is_empty());
        assert!(!frontier.has_pending());
    }

    #[test]
    fn test_settle_without_redirect() {
        let mut frontier = frontier(3);
        frontier.enqueue("https://example.com/docs/a");
        let entry = frontier.dequeue_next().unwrap();
        frontier.mark_visited_url(entry.url.clone());

        assert_eq!(
            frontier.settle(&entry.url, "https://example.com/docs/a/"),
            Completion::New
        );
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_settle_fresh_redirect_claims_target() {
        let mut frontier = frontier(3);
        frontier.enqueue("https://example.com/docs/old");
        frontier.enqueue("https://example.com/docs/whats-new");
        let old = frontier.dequeue_next().unwrap();
        assert_eq!(old.url.path(), "/docs/old");
        frontier.mark_visited_url(old.url.clone());

        // the queued target is claimed by the redirect and leaves the queue
        assert_eq!(
            frontier.settle(&old.url, "https://example.com/docs/whats-new"),
            Completion::New
        );
        assert!(frontier.is_visited("https://example.com/docs/whats-new"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_settle_redirect_to_visited_page_is_duplicate() {
        let mut frontier = frontier(3);
        frontier.mark_visited("https://example.com/docs/b");
        frontier.mark_visited("https://example.com/docs/old");
        let old = normalize("https://example.com/docs/old", frontier.filter.base()).unwrap();

        assert_eq!(
            frontier.settle(&old, "https://example.com/docs/b"),
            Completion::Duplicate
        );
    }

    #[test]
    fn test_settle_redirect_off_site_is_out_of_scope() {
        let mut frontier = frontier(3);
        let docs = normalize("https://example.com/docs", frontier.filter.base()).unwrap();
        frontier.mark_visited_url(docs.clone());

        assert_eq!(
            frontier.settle(&docs, "https://elsewhere.org/landing"),
            Completion::OutOfScope
        );
        assert_eq!(
            frontier.settle(&docs, "https://example.com/blog/moved"),
            Completion::OutOfScope
        );
        assert!(!frontier.is_visited("https://elsewhere.org/landing"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_seeded_from_start_paths() {
        let mut frontier = Frontier::seeded(&settings(&["/", "/guide"]));
        assert_eq!(frontier.len(), 2);

        let first = frontier.dequeue_next().unwrap();
        let second = frontier.dequeue_next().unwrap();
        assert_eq!(first.url.as_str(), "https://example.com/docs");
        assert_eq!(second.url.as_str(), "https://example.com/docs/guide");
        assert_eq!(first.depth, 0);
        assert!(!frontier.has_pending());
        assert!(frontier.dequeue_next().is_none());
    }

    #[test]
    fn test_seeds_that_collapse_are_deduplicated() {
        let frontier = Frontier::seeded(&settings(&["/", "", "/#intro", "https://example.com/docs/"]));
        assert_eq!(frontier.len(), 1);
    }
}
