// src/crawl/mod.rs
// =============================================================================
// This module runs a documentation crawl around the frontier.
//
// Features:
// - Concurrent fetch workers that share one frontier coordinator
// - Polite crawling: per-host delay between requests
// - Pages grouped into numbered sections for deterministic output
// - Raw HTML mirrored into the cache directory plus a JSON catalog
//
// Submodules:
// - fetch: HTTP client and page download
// - links: link and title extraction from HTML
// - throttle: per-host politeness delay
// - section: page -> section classification and file naming
// - store: cache directory layout and catalog writer
// - run: the crawl loop itself
// =============================================================================

mod fetch;
mod links;
mod run;
mod section;
mod store;
mod throttle;

// Re-export the main crawling function and what it returns
pub use run::{crawl_docs, CrawlReport};
pub use section::section_for;
