// src/error.rs
// =============================================================================
// Errors that can stop a whole crawl.
//
// Page-level problems (404, timeouts, ...) are NOT here: those are
// FetchError values that become output lines. CrawlError is only for things
// that make the crawl itself impossible: we can't write the output, the
// output task died, or a fixture file is unreadable.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to write crawl output: {0}")]
    Output(#[from] std::io::Error),

    #[error("output task failed: {0}")]
    OutputTask(#[from] tokio::task::JoinError),

    #[error("could not read fixture file {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid fixture file {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
