// src/crawl/mod.rs
// =============================================================================
// This module runs a crawl.
//
// Pieces (each in its own file):
// - registry: Which URLs have been claimed (each URL is fetched at most once)
// - sink:     Funnels result lines from all tasks into one output stream
// - tracker:  Counts in-flight tasks so we know when the crawl is over
// - engine:   The per-page logic: claim, fetch, report, fan out
//
// crawl() wires them together:
//   start URL -> engine.visit() -> tasks spawn tasks ... -> tracker hits 0
//   -> printer writes the last queued lines -> summary returned
//
// Rust concepts:
// - Arc<dyn Trait>: Shared, dynamically dispatched fetcher
// - Generics: Any `Write` target works as output (stdout, a file, a buffer)
// =============================================================================

mod engine;
mod registry;
mod sink;
mod tracker;

pub use engine::Engine;
pub use registry::VisitedRegistry;
pub use sink::{spawn_printer, CrawlEvent, CrawlSummary, OutputFormat, OutputPrinter, OutputSink};
pub use tracker::{CompletionTracker, TaskGuard};

use crate::error::Result;
use crate::fetch::Fetcher;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

// Crawls from `start_url`, at most `max_depth` levels deep
//
// Parameters:
//   fetcher: where pages come from
//   start_url: the first page
//   max_depth: 0 = nothing, 1 = just the start page, 2 = start + its links, ...
//   out: where result lines are written
//   format: text or JSON lines
//
// Returns once every task has finished and every line has been written.
// Page-level failures are output lines, not errors; Err means the output
// itself failed.
pub async fn crawl<W>(
    fetcher: Arc<dyn Fetcher>,
    start_url: &str,
    max_depth: usize,
    out: W,
    format: OutputFormat,
) -> Result<CrawlSummary>
where
    W: Write + Send + 'static,
{
    info!(start_url, max_depth, "starting crawl");

    let (sink, printer) = spawn_printer(out, format);
    let engine = Engine::new(fetcher, sink);
    let tracker = Arc::clone(engine.tracker());

    // The root counts as in-flight work until its task (if any) is spawned
    {
        let _root = tracker.register();
        engine.visit(start_url.to_string(), max_depth);
    }
    tracker.wait().await;

    let visited = engine.registry().len();
    drop(engine);

    let summary = printer.finish().await?;
    info!(
        visited,
        found = summary.found,
        failed = summary.failed,
        already_crawled = summary.already_crawled,
        "crawl finished"
    );

    Ok(summary)
}
