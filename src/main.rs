// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, on stderr)
// 3. Build the right fetcher and run the crawl
// 4. Print a summary and exit (0 = crawl completed, 2 = error)
//
// Result lines go to stdout; logs and the summary go to stderr, so the
// output can be piped into other tools untouched.
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use link_crawler::fetch::normalize_url;
use link_crawler::{crawl, CrawlSummary, Fetcher, FixtureFetcher, HttpFetcher, HttpFetcherConfig, OutputFormat};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Site {
            start_url,
            max_depth,
            json,
            same_domain,
            timeout_secs,
            user_agent,
        } => {
            // Crawl the normalized form: it is what pages linking back here produce
            let start = normalize_url(&start_url)
                .with_context(|| format!("Invalid URL '{}'", start_url))?;

            let mut config = HttpFetcherConfig {
                timeout: Duration::from_secs(timeout_secs),
                ..HttpFetcherConfig::default()
            };
            if let Some(user_agent) = user_agent {
                config.user_agent = user_agent;
            }
            if same_domain {
                let domain = start
                    .domain()
                    .ok_or_else(|| anyhow!("URL has no domain: {}", start_url))?;
                config.same_domain = Some(domain.to_string());
            }

            let fetcher = HttpFetcher::new(config).context("Failed to create HTTP client")?;
            eprintln!("🔍 Crawling website: {}", start);
            handle_crawl(Arc::new(fetcher), start.as_str(), max_depth, json).await
        }
        Commands::Demo {
            max_depth,
            json,
            fixture,
            start_url,
        } => {
            let fetcher = match fixture {
                Some(path) => FixtureFetcher::from_file(&path)?,
                None => FixtureFetcher::golang_demo(),
            };
            eprintln!("🔍 Crawling {} canned page(s) from {}", fetcher.len(), start_url);
            handle_crawl(Arc::new(fetcher), &start_url, max_depth, json).await
        }
    }
}

// Runs the crawl with stdout as the output stream
async fn handle_crawl(fetcher: Arc<dyn Fetcher>, start_url: &str, max_depth: usize, json: bool) -> Result<()> {
    eprintln!("📊 Max crawl depth: {}", max_depth);

    let format = if json { OutputFormat::Json } else { OutputFormat::Text };
    let summary = crawl(fetcher, start_url, max_depth, std::io::stdout(), format).await?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &CrawlSummary) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   ✅ Found: {}", summary.found);
    eprintln!("   ❌ Failed: {}", summary.failed);
    eprintln!("   🔁 Already crawled: {}", summary.already_crawled);
}

// Logs go to stderr; RUST_LOG wins over --verbose when it is set
fn init_logging(verbose: bool) {
    let default = if verbose { "link_crawler=debug" } else { "link_crawler=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
