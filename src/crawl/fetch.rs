// src/crawl/fetch.rs
// =============================================================================
// Downloads documentation pages.
//
// - One reqwest Client is built per crawl and shared by all workers
//   (it pools connections internally, and cloning it is cheap)
// - Redirects are followed; the final URL is reported so the frontier can
//   decide whether the content may be saved at all (it may have left the
//   allowed domains) and links are resolved against the right page
// - Any non-2xx response is an error for this page only
// =============================================================================

use crate::error::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("docs-fetcher/", env!("CARGO_PKG_VERSION"));

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    /// True if the page is worth parsing for links (HTML, or no content
    /// type at all).
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
    }
}

// Creates the HTTP client used for the whole crawl
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

// Fetches a page and returns its body
//
// Parameters:
//   client: the shared HTTP client (follows up to 5 redirects)
//   url: the page to fetch
//
// Returns: the body together with the URL the redirects ended at, or an
// error for network failures and non-2xx statuses
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;

    Ok(FetchedPage {
        final_url,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content_type: Option<&str>) -> FetchedPage {
        FetchedPage {
            final_url: "https://example.com/docs".to_string(),
            content_type: content_type.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn test_is_html() {
        assert!(page(Some("text/html; charset=utf-8")).is_html());
        assert!(page(Some("application/XHTML+xml")).is_html());
        assert!(page(None).is_html());
        assert!(!page(Some("application/json")).is_html());
    }

    #[tokio::test]
    async fn test_fetch_reports_status_errors() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/docs/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = fetch_page(&client, &format!("{}/docs/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_content_type() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/docs")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<title>Docs</title>")
            .create_async()
            .await;

        let client = build_client(Duration::from_secs(5)).unwrap();
        let url = format!("{}/docs", server.url());
        let page = fetch_page(&client, &url).await.unwrap();

        assert_eq!(page.final_url, url);
        assert_eq!(page.content_type.as_deref(), Some("text/html"));
        assert_eq!(page.body, "<title>Docs</title>");
    }
}
