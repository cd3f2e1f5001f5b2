// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - site: crawl a real website over HTTP
// - demo: crawl a canned graph (built-in fake golang.org, or a JSON file)
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - Enums: One variant per subcommand
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a site in parallel, fetching every page exactly once",
    long_about = "link-crawler follows links from a start page up to a maximum depth. \
                  Every page is fetched by its own task, each URL is fetched at most once, \
                  and results are printed one line per page as they arrive."
)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website
    ///
    /// Example: link-crawler site https://example.com --max-depth 2
    Site {
        /// URL to start crawling from
        start_url: String,

        /// Maximum crawl depth
        ///
        /// Depth 1 = just the start page
        /// Depth 2 = start page + all pages it links to
        /// etc.
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Output one JSON object per line instead of text
        #[arg(long)]
        json: bool,

        /// Only follow links on the start URL's domain
        #[arg(long)]
        same_domain: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// User-Agent header to send
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Crawl a canned graph without touching the network
    ///
    /// Example: link-crawler demo --max-depth 4
    Demo {
        /// Maximum crawl depth
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output one JSON object per line instead of text
        #[arg(long)]
        json: bool,

        /// JSON fixture file: { "<url>": { "body": "...", "urls": ["..."] } }
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Start URL (defaults to http://golang.org/)
        #[arg(long, default_value = "http://golang.org/")]
        start_url: String,
    },
}
