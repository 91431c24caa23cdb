// src/crawl/run.rs
// =============================================================================
// The crawl loop: drains the frontier, fetches pages, feeds links back.
//
// How it works:
// 1. Create the cache directory and seed the frontier from the start paths
// 2. Hand the frontier to the coordinator task
// 3. Start `workers` fetch tasks; each one loops:
//      next URL -> wait for politeness slot -> fetch -> report links
//      -> get section/page numbers -> save to cache
// 4. When every worker is done, write the catalog and return a report
//
// A page that fails to fetch or save is recorded in the report and the
// crawl carries on. A page whose redirects end outside the allowed
// domains, or at a page the crawl already has, is skipped and not saved. Only setup problems (cache directory, HTTP client,
// catalog) fail the whole run.
// =============================================================================

use super::fetch::{build_client, fetch_page};
use super::links::{extract_links, extract_title};
use super::section::section_for;
use super::store::{PageRecord, PageStore};
use super::throttle::HostThrottle;
use crate::config::CrawlSettings;
use crate::error::CrawlError;
use crate::frontier::{
    spawn_coordinator, Completion, Frontier, FrontierEntry, FrontierHandle, FrontierStats, Lease,
};
use reqwest::Client;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// A page that was handed out but could not be fetched or saved.
#[derive(Debug, Clone, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Everything a crawl run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Saved pages, sorted by section then page number
    pub pages: Vec<PageRecord>,
    pub failures: Vec<FailedPage>,
    pub stats: FrontierStats,
    pub catalog_path: PathBuf,
}

impl CrawlReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// State shared (read-only) by all workers
struct WorkerContext {
    base: Url,
    client: Client,
    throttle: HostThrottle,
    store: PageStore,
}

#[derive(Default)]
struct WorkerOutcome {
    pages: Vec<PageRecord>,
    failures: Vec<FailedPage>,
}

// Crawls one documentation site and mirrors it into the cache directory
//
// Parameters:
//   settings: validated settings for this run
//
// Returns: a CrawlReport with every saved page (sorted by section, then
// page) and every page that failed. Err only if the crawl itself could
// not run: cache directory, HTTP client, worker panic or catalog write.
pub async fn crawl_docs(settings: &CrawlSettings) -> Result<CrawlReport, CrawlError> {
    let store = PageStore::create(&settings.cache_dir).await?;
    let client = build_client(settings.timeout)?;

    let frontier = Frontier::seeded(settings);
    info!(
        base = %settings.base,
        seeds = frontier.len(),
        limit = settings.limit,
        max_depth = settings.max_depth,
        workers = settings.workers,
        "starting crawl"
    );

    let (handle, coordinator) = spawn_coordinator(frontier, settings.limit);
    let context = Arc::new(WorkerContext {
        base: settings.base.clone(),
        client,
        throttle: HostThrottle::new(settings.delay),
        store,
    });

    let workers: Vec<_> = (0..settings.workers)
        .map(|id| {
            let handle = handle.clone();
            let context = Arc::clone(&context);
            tokio::spawn(async move { run_worker(id, handle, context).await })
        })
        .collect();

    // Only the workers may keep the coordinator alive from here on
    drop(handle);

    let mut pages = Vec::new();
    let mut failures = Vec::new();
    for joined in futures::future::join_all(workers).await {
        let outcome = joined??;
        pages.extend(outcome.pages);
        failures.extend(outcome.failures);
    }

    let stats = coordinator.await?;
    let catalog_path = context
        .store
        .write_catalog(&settings.package_docs_file, &settings.base, &mut pages)
        .await?;

    info!(
        saved = pages.len(),
        failed = failures.len(),
        pending = stats.pending,
        catalog = %catalog_path.display(),
        "crawl finished"
    );

    Ok(CrawlReport {
        pages,
        failures,
        stats,
        catalog_path,
    })
}

async fn run_worker(
    id: usize,
    handle: FrontierHandle,
    context: Arc<WorkerContext>,
) -> Result<WorkerOutcome, CrawlError> {
    let mut outcome = WorkerOutcome::default();

    while let Some(lease) = handle.next().await? {
        let entry: FrontierEntry = lease.entry().clone();
        info!(worker = id, depth = entry.depth, url = %entry.url, "fetching");
        match process_entry(&handle, &context, lease).await? {
            PageOutcome::Saved(record) => outcome.pages.push(record),
            PageOutcome::Skipped => {}
            PageOutcome::Failed(error) => {
                warn!(url = %entry.url, %error, "page failed");
                outcome.failures.push(FailedPage {
                    url: entry.url.to_string(),
                    error,
                });
            }
        }
    }

    if let Ok(stats) = handle.stats().await {
        debug!(
            worker = id,
            saved = outcome.pages.len(),
            dispatched = stats.dispatched,
            pending = stats.pending,
            "worker done"
        );
    }
    Ok(outcome)
}

enum PageOutcome {
    Saved(PageRecord),
    /// Fetched fine but not saved: not HTML, or redirected to a page that
    /// is out of scope or already covered
    Skipped,
    Failed(String),
}

// Fetches, reports and saves one page
//
// Always settles the lease (even when the fetch fails) so the page no
// longer counts as in flight. Only a lost coordinator is an Err;
// page-level problems come back as PageOutcome::Failed.
async fn process_entry(
    handle: &FrontierHandle,
    context: &WorkerContext,
    lease: Lease,
) -> Result<PageOutcome, CrawlError> {
    let entry = lease.entry().clone();
    if let Some(host) = entry.url.host() {
        context.throttle.wait_turn(host).await;
    }

    let page = match fetch_page(&context.client, entry.url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            lease.release().await?;
            return Ok(PageOutcome::Failed(e.to_string()));
        }
    };

    let links = if page.is_html() {
        extract_links(&page.body, &page.final_url)
    } else {
        Vec::new()
    };
    match lease.complete(&page.final_url, links).await? {
        Completion::New => {}
        Completion::Duplicate => {
            debug!(
                url = %entry.url,
                final_url = %page.final_url,
                "redirected to a page already crawled, not saved"
            );
            return Ok(PageOutcome::Skipped);
        }
        Completion::OutOfScope => {
            warn!(
                url = %entry.url,
                final_url = %page.final_url,
                "redirected out of scope, not saved"
            );
            return Ok(PageOutcome::Skipped);
        }
    }

    if !page.is_html() {
        debug!(url = %entry.url, content_type = ?page.content_type, "not HTML, not saved");
        return Ok(PageOutcome::Skipped);
    }

    let section = section_for(&context.base, &entry.url);
    let (section_number, page_number) = handle.classify(&section, &entry.url).await?;

    let path = PageStore::relative_path(&entry.url, &section, section_number, page_number);
    if let Err(e) = context.store.save_page(&path, &page.body).await {
        return Ok(PageOutcome::Failed(e.to_string()));
    }

    Ok(PageOutcome::Saved(PageRecord {
        title: extract_title(&page.body),
        section,
        section_number,
        page_number,
        url: entry.url.clone(),
        depth: entry.depth,
        path,
    }))
}
