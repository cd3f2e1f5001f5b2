// src/crawl/sink.rs
// =============================================================================
// The output sink: one ordered stream of result lines from many tasks.
//
// Every crawl task reports what happened to its page by emitting a
// CrawlEvent. Events go into an unbounded channel; a single printer task
// drains the channel and writes one whole line per event. Since only the
// printer ever touches the writer, two lines can never interleave.
//
// There is no global order: lines come out in whatever order tasks emit
// them. The printer also counts the events for the final summary.
//
// Output formats:
//   text:  found: http://golang.org/ "The Go Programming Language"
//          not found: http://golang.org/cmd/
//          already crawled: http://golang.org/
//   json:  {"kind":"found","url":"http://golang.org/","body":"..."}
//
// Rust concepts:
// - mpsc channel: Many producers, one consumer
// - spawn_blocking: Run blocking I/O (writing to stdout) off the async threads
// - Display: How a type turns into text
// =============================================================================

use crate::error::Result;
use crate::fetch::FetchError;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// One result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// The page was fetched
    Found { url: String, body: String },
    /// The fetch failed; `error` is the full error text
    Failed { url: String, error: String },
    /// Another task had already claimed this URL
    AlreadyCrawled { url: String },
}

impl CrawlEvent {
    pub fn failed(url: &str, error: &FetchError) -> Self {
        CrawlEvent::Failed {
            url: url.to_string(),
            error: error.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Found { url, .. }
            | CrawlEvent::Failed { url, .. }
            | CrawlEvent::AlreadyCrawled { url } => url,
        }
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // {:?} quotes and escapes the body, so it always stays on one line
            CrawlEvent::Found { url, body } => write!(f, "found: {} {:?}", url, body),
            CrawlEvent::Failed { error, .. } => write!(f, "{}", error),
            CrawlEvent::AlreadyCrawled { url } => write!(f, "already crawled: {}", url),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    /// Renders an event as one complete line, newline included
    pub fn render(&self, event: &CrawlEvent) -> io::Result<String> {
        let mut line = match self {
            OutputFormat::Text => event.to_string(),
            OutputFormat::Json => serde_json::to_string(event)?,
        };
        line.push('\n');
        Ok(line)
    }
}

// Counts of each kind of result line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub found: usize,
    pub failed: usize,
    pub already_crawled: usize,
}

impl CrawlSummary {
    pub fn record(&mut self, event: &CrawlEvent) {
        match event {
            CrawlEvent::Found { .. } => self.found += 1,
            CrawlEvent::Failed { .. } => self.failed += 1,
            CrawlEvent::AlreadyCrawled { .. } => self.already_crawled += 1,
        }
    }

    /// Total number of lines written
    pub fn total(&self) -> usize {
        self.found + self.failed + self.already_crawled
    }
}

// Producer handle; cheap to clone, one per crawl task
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: mpsc::UnboundedSender<CrawlEvent>,
    // Shared by all clones: the closed-output warning is logged once per crawl
    closed_reported: Arc<AtomicBool>,
}

impl OutputSink {
    /// Queues an event for printing; never blocks
    pub fn emit(&self, event: CrawlEvent) {
        // Only fails if the printer already stopped on a write error,
        // which OutputPrinter::finish() reports
        if let Err(mpsc::error::SendError(event)) = self.tx.send(event) {
            if !self.closed_reported.swap(true, Ordering::Relaxed) {
                tracing::warn!(url = event.url(), "output closed, dropping further result lines");
            }
        }
    }

    /// True once the printer has stopped; nothing emitted will be written
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

// Consumer side: the task that writes lines
#[derive(Debug)]
pub struct OutputPrinter {
    handle: JoinHandle<io::Result<CrawlSummary>>,
}

impl OutputPrinter {
    /// Waits for every queued line to be written
    ///
    /// Only returns once all OutputSink clones have been dropped.
    pub async fn finish(self) -> Result<CrawlSummary> {
        Ok(self.handle.await??)
    }
}

/// Starts the printer task writing to `out`
pub fn spawn_printer<W>(out: W, format: OutputFormat) -> (OutputSink, OutputPrinter)
where
    W: Write + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::task::spawn_blocking(move || drain(rx, out, format));
    let sink = OutputSink {
        tx,
        closed_reported: Arc::new(AtomicBool::new(false)),
    };
    (sink, OutputPrinter { handle })
}

fn drain<W: Write>(
    mut rx: mpsc::UnboundedReceiver<CrawlEvent>,
    mut out: W,
    format: OutputFormat,
) -> io::Result<CrawlSummary> {
    let mut summary = CrawlSummary::default();

    while let Some(event) = rx.blocking_recv() {
        let line = format.render(&event)?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        summary.record(&event);
    }

    Ok(summary)
}
