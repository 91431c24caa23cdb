// src/logging.rs
// =============================================================================
// Sets up tracing output for the whole program.
//
// - Log lines go to stderr, so `--json` output on stdout stays parseable
// - RUST_LOG wins if set (e.g. RUST_LOG=docs_fetcher=trace)
// - Otherwise we log at info, or debug with --verbose
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Installs the global tracing subscriber (call once, at startup)
pub fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "docs_fetcher=debug"
    } else {
        "docs_fetcher=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
