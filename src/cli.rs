// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - crawl: mirror a documentation site into the cache directory
// - inspect: show how URLs would be normalized and filtered, without
//   fetching anything
//
// Every crawl flag is optional when a config file provides the value;
// flags given on the command line override the file.
// =============================================================================

use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "docs-fetcher",
    version,
    about = "Mirror third-party package documentation into a local cache",
    long_about = "docs-fetcher crawls a documentation site from a base URL, stays on the allowed \
                  domains, skips non-documentation pages, and writes every page plus a catalog \
                  into a cache directory in a stable, numbered layout."
)]
pub struct Cli {
    /// Log debug output (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a documentation site into the cache directory
    ///
    /// Example: docs-fetcher crawl https://docs.rs/serde/latest/serde --limit 20
    Crawl(CrawlArgs),

    /// Show the normalized form and filter verdict for each URL
    ///
    /// Example: docs-fetcher inspect --base https://example.com/docs guide/ /logo.png
    Inspect {
        /// Base URL that relative URLs are resolved against
        #[arg(long)]
        base: String,

        /// Allowed domain (repeatable); defaults to the base URL's host
        #[arg(long = "allowed-domain")]
        allowed_domains: Vec<String>,

        /// URLs to inspect
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Documentation root URL (e.g., https://example.com/docs)
    pub base_url: Option<String>,

    /// JSON config file with camelCase keys (baseUrl, startPaths, limit, ...)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Start path under the base URL (repeatable, default: /)
    #[arg(long = "start-path")]
    pub start_paths: Vec<String>,

    /// Allowed domain, subdomains included (repeatable, default: base host)
    #[arg(long = "allowed-domain")]
    pub allowed_domains: Vec<String>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    pub limit: Option<usize>,

    /// Maximum link depth from a start path (start paths are depth 0)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Milliseconds between fetches of the same host
    #[arg(long)]
    pub delay: Option<u64>,

    /// Number of concurrent fetch workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Output directory for fetched pages and the catalog
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Output the crawl report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    /// The flags that override config file values.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            allowed_domains: self.allowed_domains.clone(),
            start_paths: self.start_paths.clone(),
            limit: self.limit,
            max_depth: self.max_depth,
            delay: self.delay,
            workers: self.workers,
            cache_dir: self.cache_dir.clone(),
        }
    }
}
