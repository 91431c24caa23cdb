// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, RUST_LOG aware)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with a proper code
//    (0 = success, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - config file + flag overrides
mod crawl;    // src/crawl/ - fetch workers, cache store, crawl loop
mod error;    // src/error.rs - typed errors
mod frontier; // src/frontier/ - normalization, filtering, queue, ordering
mod logging;  // src/logging.rs - tracing subscriber setup

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, CrawlArgs};
use config::{FetchConfig, PackageDiscovery};
use serde::Serialize;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
        Commands::Inspect {
            base,
            allowed_domains,
            urls,
            json,
        } => handle_inspect(&base, &allowed_domains, &urls, json),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => FetchConfig::load(path)?,
        None => FetchConfig::default(),
    };
    config.apply(args.overrides());

    if config.packages != PackageDiscovery::default() {
        info!(
            packages = ?config.packages,
            "package discovery settings are handled by the package scanner, not the crawler"
        );
    }

    let settings = config.settings()?;

    if !args.json {
        println!("🔍 Crawling documentation: {}", settings.base);
        println!(
            "📊 Limit: {} page(s), max depth: {}, workers: {}",
            settings.limit, settings.max_depth, settings.workers
        );
    }

    let report = crawl::crawl_docs(&settings).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.is_clean() { 0 } else { 1 })
}

// One row of `inspect` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectRow {
    input: String,
    normalized: Option<String>,
    allowed_domain: bool,
    documentation_path: bool,
    allowed: bool,
    section: Option<String>,
}

// Handles the 'inspect' subcommand
fn handle_inspect(base: &str, allowed_domains: &[String], urls: &[String], json: bool) -> Result<i32> {
    let base = config::parse_base_url(base)?;
    let allowed_domains = if allowed_domains.is_empty() {
        base.host_str().map(|h| vec![h.to_string()]).unwrap_or_default()
    } else {
        allowed_domains.to_vec()
    };
    let filter = frontier::UrlFilter::new(base.clone(), &allowed_domains);

    let rows: Vec<InspectRow> = urls
        .iter()
        .map(|input| {
            let normalized = frontier::normalize(input, &base);
            let allowed_domain = normalized
                .as_ref()
                .is_some_and(|url| filter.is_allowed_domain(url.as_str()));
            let documentation_path = normalized
                .as_ref()
                .is_some_and(|url| frontier::is_documentation_path(url.path()));

            InspectRow {
                input: input.clone(),
                allowed: filter.is_allowed_url(input),
                section: normalized.as_ref().map(|url| crawl::section_for(&base, url)),
                normalized: normalized.map(|url| url.to_string()),
                allowed_domain,
                documentation_path,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{:<50} {:<8} {:<10} {:<50}", "NORMALIZED", "ALLOWED", "SECTION", "INPUT");
        println!("{}", "=".repeat(120));
        for row in &rows {
            println!(
                "{:<50} {:<8} {:<10} {:<50}",
                truncate(row.normalized.as_deref().unwrap_or("(unparseable)"), 50),
                if row.allowed { "✅ yes" } else { "❌ no" },
                row.section.as_deref().unwrap_or("-"),
                row.input,
            );
        }
    }

    Ok(0)
}

// Prints the crawl report as a human-readable table
fn print_report(report: &crawl::CrawlReport) {
    println!();
    println!("{:<8} {:<5} {:<60} {:<30}", "SECTION", "PAGE", "URL", "TITLE");
    println!("{}", "=".repeat(105));

    for page in &report.pages {
        println!(
            "{:<8} {:<5} {:<60} {:<30}",
            format!("{:02}", page.section_number),
            format!("{:03}", page.page_number),
            truncate(page.url.as_str(), 60),
            page.title.as_deref().unwrap_or(""),
        );
    }

    if !report.failures.is_empty() {
        println!();
        println!("❌ Failed pages:");
        for failure in &report.failures {
            println!("   {} ({})", failure.url, failure.error);
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Saved: {}", report.pages.len());
    println!("   ❌ Failed: {}", report.failures.len());
    println!("   ⏭️  Left in queue: {}", report.stats.pending);
    println!("   📚 Catalog: {}", report.catalog_path.display());
}

// Shortens long strings for table display
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
