// src/lib.rs
// =============================================================================
// link-crawler: a concurrent, depth-bounded crawler.
//
// Starting from one URL, every discovered link becomes its own tokio task.
// A shared registry guarantees each URL is fetched at most once, a wait
// group tells us when the last task is done, and a single printer task
// turns results from all tasks into one clean stream of lines.
//
// Modules:
// - crawl: The engine (registry, sink, tracker, traversal)
// - fetch: Where pages come from (fixtures or real HTTP)
// - error: Errors that stop a whole crawl
// =============================================================================

pub mod crawl;
pub mod error;
pub mod fetch;

pub use crawl::{crawl, CrawlEvent, CrawlSummary, OutputFormat};
pub use error::{CrawlError, Result};
pub use fetch::{FetchError, Fetcher, FixtureFetcher, HttpFetcher, HttpFetcherConfig, Page};
