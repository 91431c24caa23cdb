// src/crawl/store.rs
// =============================================================================
// Writes fetched pages and the catalog into the cache directory.
//
// Layout:
//   <cacheDir>/
//     <packageDocsFile>                     catalog of every saved page
//     <host>/
//       01-index/001-index.html
//       02-guide/001-guide.html
//       02-guide/002-install.html
//
// The numbers come from the section/page order, so the layout (and the
// catalog, which is sorted the same way) is deterministic even when the
// crawl visits pages in a different order from run to run.
// =============================================================================

use super::section::{page_slug, slug};
use crate::error::StoreError;
use crate::frontier::NormalizedUrl;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// One saved page, as listed in the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub section: String,
    pub section_number: usize,
    pub page_number: usize,
    pub url: NormalizedUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub depth: usize,
    /// Location of the saved HTML, relative to the cache directory
    pub path: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Catalog<'a> {
    base_url: &'a str,
    page_count: usize,
    pages: &'a [PageRecord],
}

#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Creates the cache directory if needed.
    pub async fn create(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root).await.map_err(|source| StoreError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Where a page lives, relative to the cache directory.
    pub fn relative_path(
        url: &NormalizedUrl,
        section: &str,
        section_number: usize,
        page_number: usize,
    ) -> PathBuf {
        let host = url
            .host()
            .unwrap_or("unknown-host")
            .replace(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'), "_");

        PathBuf::from(host)
            .join(format!("{:02}-{}", section_number, slug(section)))
            .join(format!("{:03}-{}.html", page_number, page_slug(url)))
    }

    /// Writes a page body to `relative` (as returned by relative_path).
    pub async fn save_page(&self, relative: &Path, body: &str) -> Result<PathBuf, StoreError> {
        let path = self.root.join(relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(&path, body).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Sorts `pages` by section then page number and writes the catalog.
    pub async fn write_catalog(
        &self,
        file_name: &str,
        base: &Url,
        pages: &mut [PageRecord],
    ) -> Result<PathBuf, StoreError> {
        pages.sort_by_key(|page| (page.section_number, page.page_number));

        let catalog = Catalog {
            base_url: base.as_str(),
            page_count: pages.len(),
            pages,
        };
        let json = serde_json::to_string_pretty(&catalog)?;

        let path = self.root.join(file_name);
        fs::write(&path, json).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
