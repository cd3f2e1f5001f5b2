// src/crawl/engine.rs
// =============================================================================
// The traversal engine: recursive, parallel, depth-bounded crawling.
//
// Two steps, split so every discovered link is handled the same way:
//
// visit(url, depth)      -- called by whoever DISCOVERED the link
//   1. depth == 0?            -> stop, nothing printed
//   2. claim url in registry  -> lost the race? print "already crawled"
//   3. register with tracker, spawn traverse()
//
// traverse(url, depth)   -- runs as its own tokio task
//   1. fetch the page         -> error? print it, stop (no retry)
//   2. print "found"
//   3. visit() every child with depth - 1 (skipped once the output is
//      closed, since nothing found could be printed any more)
//
// The depth check comes before the claim, so a link we are too deep to
// follow never takes a URL away from a shorter path.
//
// traverse() returns as soon as its children are spawned; it does NOT wait
// for them. The CompletionTracker is what tells us the whole crawl is over.
//
// Rust concepts:
// - Arc: Shared ownership across tasks
// - tokio::spawn: Run a future as an independent task
// - BoxFuture: A heap-allocated future, needed because tasks spawn tasks
// =============================================================================

use super::registry::VisitedRegistry;
use super::sink::{CrawlEvent, OutputSink};
use super::tracker::{CompletionTracker, TaskGuard};
use crate::fetch::Fetcher;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, trace, warn};

// Everything a crawl task needs; cloned into every task
#[derive(Clone)]
pub struct Engine {
    fetcher: Arc<dyn Fetcher>,
    registry: Arc<VisitedRegistry>,
    tracker: Arc<CompletionTracker>,
    sink: OutputSink,
}

impl Engine {
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: OutputSink) -> Self {
        Self {
            fetcher,
            registry: Arc::new(VisitedRegistry::new()),
            tracker: Arc::new(CompletionTracker::new()),
            sink,
        }
    }

    pub fn tracker(&self) -> &Arc<CompletionTracker> {
        &self.tracker
    }

    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    /// Handles one discovered link with `depth` levels left to crawl
    ///
    /// Must be called from inside a tokio runtime.
    pub fn visit(&self, url: String, depth: usize) {
        if depth == 0 {
            trace!(%url, "depth exhausted");
            return;
        }

        if !self.registry.claim_if_new(&url) {
            debug!(%url, "already crawled");
            self.sink.emit(CrawlEvent::AlreadyCrawled { url });
            return;
        }

        // Counted before the task exists, so wait() can't see a false zero
        let guard = self.tracker.register();
        debug!(%url, depth, "spawning crawl task");
        tokio::spawn(self.clone().traverse(url, depth, guard));
    }

    // Fetches a claimed URL, reports it, and fans out to its children
    fn traverse(self, url: String, depth: usize, guard: TaskGuard) -> BoxFuture<'static, ()> {
        async move {
            // Dropped on every way out of this block: done() runs exactly once
            let _guard = guard;

            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(%url, error = %e, "fetch failed");
                    self.sink.emit(CrawlEvent::failed(&url, &e));
                    return;
                }
            };

            let children = page.urls;
            self.sink.emit(CrawlEvent::Found {
                url: url.clone(),
                body: page.body,
            });

            // Nothing we find from here on could be printed
            if self.sink.is_closed() {
                debug!(%url, "output closed, not following links");
                return;
            }

            for child in children {
                self.visit(child, depth - 1);
            }
        }
        .boxed()
    }
}
