// src/frontier/mod.rs
// =============================================================================
// The crawl frontier: which URLs to fetch, in what order, and how to number
// the pages we get back.
//
// Submodules (leaves first):
// - normalize: canonical URL form (NormalizedUrl)
// - filter: allowed-domain and documentation-path checks
// - visited: URLs already handed out
// - queue: the deduplicated, path-ordered Frontier
// - order: section/page numbering for deterministic output
// - coordinator: single-owner task that workers talk to over channels
//
// Everything except the coordinator is plain synchronous, in-memory code
// with no I/O.
// =============================================================================

mod coordinator;
mod filter;
mod normalize;
mod order;
mod queue;
mod visited;

pub use coordinator::{spawn_coordinator, FrontierHandle, FrontierStats, Lease};
pub use filter::{is_documentation_path, UrlFilter};
pub use normalize::{normalize, NormalizedUrl};
pub use queue::{Completion, Frontier, FrontierEntry};
