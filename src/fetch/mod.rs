// src/fetch/mod.rs
// =============================================================================
// This module defines how the crawler gets a page.
//
// The crawl engine doesn't care WHERE pages come from. It only needs
// something that turns a URL into:
// - the page content (body)
// - the URLs the page links to
// or an error.
//
// That "something" is the Fetcher trait. We ship two implementations:
// - fixture: canned pages from memory or a JSON file (demos and tests)
// - http: real pages from the web, using reqwest + scraper
//
// Rust concepts:
// - Traits: Shared behavior that different types implement
// - async-trait: Allows async methods in trait objects (Arc<dyn Fetcher>)
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod fixture;
mod http;
mod links;

pub use fixture::FixtureFetcher;
pub use http::{HttpFetcher, HttpFetcherConfig};
pub use links::{
    extract_html_links, extract_html_title, extract_markdown_links, extract_markdown_title,
    normalize_url,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// What a successful fetch returns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Content summary (page title, or the canned body for fixtures)
    pub body: String,
    /// Outbound links found on the page
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            body: body.into(),
            urls,
        }
    }
}

// Why a single page could not be fetched
//
// These errors are always local to one page: the engine turns them into an
// output line and moves on. The Display text IS the output line, so every
// variant mentions the URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("timed out fetching {0}")]
    Timeout(String),

    #[error("connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("error fetching {url}: {message}")]
    Other { url: String, message: String },
}

/// Turns a URL into its content and outbound links
///
/// Implementations must be safe to call from many tasks at once with
/// different URLs.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}
