// src/fetch/http.rs
// =============================================================================
// A Fetcher that downloads real pages over HTTP.
//
// For each URL:
// 1. GET the page (reqwest, with a timeout)
// 2. Non-2xx status -> FetchError::Status
// 3. HTML -> title as the content summary, <a href> links as children
//    Markdown -> first heading as the summary, [text](url) links as children
//
// Network errors are sorted into timeout / connection / other, so the
// output line says something more useful than a raw reqwest message.
//
// One reqwest Client is shared by every crawl task. Client is internally
// reference counted, so this gives us connection pooling for free.
// =============================================================================

use super::links::{
    extract_html_links, extract_html_title, extract_markdown_links, extract_markdown_title,
};
use super::{FetchError, Fetcher, Page};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// If set, only links on this domain are returned as children
    pub same_domain: Option<String>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            same_domain: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    same_domain: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            same_domain: config.same_domain,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Resolve links against where we ended up, not where we started
        let final_url = response.url().to_string();
        let markdown = is_markdown(&response);

        let text = response.text().await.map_err(|e| categorize_error(url, e))?;
        debug!(url, bytes = text.len(), markdown, "fetched page");

        let same_domain = self.same_domain.as_deref();
        let page = if markdown {
            Page::new(
                extract_markdown_title(&text),
                extract_markdown_links(&text, &final_url, same_domain),
            )
        } else {
            Page::new(
                extract_html_title(&text),
                extract_html_links(&text, &final_url, same_domain),
            )
        };

        Ok(page)
    }
}

fn is_markdown(response: &reqwest::Response) -> bool {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    content_type.starts_with("text/markdown") || response.url().path().ends_with(".md")
}

// Sorts reqwest errors into our FetchError variants
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();

    if error.is_timeout() {
        FetchError::Timeout(url)
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Other {
            url,
            message: error.to_string(),
        }
    }
}
