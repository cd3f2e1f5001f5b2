// src/fetch/fixture.rs
// =============================================================================
// A Fetcher that serves canned pages instead of hitting the network.
//
// Useful for:
// - The `demo` subcommand (a small fake golang.org site)
// - Crawling a hand-written graph from a JSON file
// - Tests, where we want exact, repeatable graphs
//
// JSON fixture format:
//   {
//     "http://example.com/": { "body": "Home", "urls": ["http://example.com/a"] },
//     "http://example.com/a": { "body": "A" }
//   }
//
// Any URL that isn't in the map fails with "not found: <url>".
// =============================================================================

use super::{FetchError, Fetcher, Page};
use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Page>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a page; builder style
    pub fn with_page(mut self, url: &str, body: &str, urls: &[&str]) -> Self {
        self.insert(url, Page::new(body, urls.iter().map(|u| u.to_string()).collect()));
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, page: Page) {
        self.pages.insert(url.into(), page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Parses a fixture from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let pages: HashMap<String, Page> = serde_json::from_str(json)?;
        Ok(Self { pages })
    }

    /// Loads a fixture from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CrawlError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json).map_err(|source| CrawlError::FixtureParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The fake golang.org site used by the `demo` subcommand
    ///
    /// http://golang.org/cmd/ is linked but missing, so the demo also shows
    /// a fetch failure.
    pub fn golang_demo() -> Self {
        Self::new()
            .with_page(
                "http://golang.org/",
                "The Go Programming Language",
                &["http://golang.org/pkg/", "http://golang.org/cmd/"],
            )
            .with_page(
                "http://golang.org/pkg/",
                "Packages",
                &[
                    "http://golang.org/",
                    "http://golang.org/cmd/",
                    "http://golang.org/pkg/fmt/",
                    "http://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "http://golang.org/pkg/fmt/",
                "Package fmt",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
            .with_page(
                "http://golang.org/pkg/os/",
                "Package os",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
