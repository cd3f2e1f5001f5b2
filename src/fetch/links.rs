// src/fetch/links.rs
// =============================================================================
// This module pulls outbound links (and a title) out of fetched documents.
//
// - HTML: scraper parses the DOM, we select every <a href> and the <title>
// - Markdown: pulldown-cmark streams events, we collect link destinations
//
// Every href is resolved against the page URL with the `url` crate, so
// relative links like "/docs" or "../about" become absolute. We keep only
// http/https links, drop fragments, and (optionally) stay on one domain.
//
// Rust concepts:
// - Iterators: For processing collections
// - Option<T>: For links that can't be resolved
// - HashSet: To drop duplicate links on the same page
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//   same_domain: if Some(domain), only links on that domain are kept
//
// Returns: absolute URLs, in document order, without duplicates
pub fn extract_html_links(html: &str, page_url: &str, same_domain: Option<&str>) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(page_url, "invalid base URL, skipping link extraction");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);

    // "a[href]" is a constant, known-valid selector
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"));

    collect_links(&base, hrefs, same_domain)
}

// Returns the trimmed text of the first <title>, or "" if there is none
pub fn extract_html_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("title is a valid selector");

    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

// Extracts all crawlable links from Markdown text
//
// Same rules as extract_html_links, but the links come from [text](url)
// markup instead of <a> tags.
pub fn extract_markdown_links(markdown: &str, page_url: &str, same_domain: Option<&str>) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(page_url, "invalid base URL, skipping link extraction");
            return Vec::new();
        }
    };

    let mut destinations = Vec::new();
    for event in Parser::new(markdown) {
        // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            destinations.push(dest_url.to_string());
        }
    }

    collect_links(&base, destinations.iter().map(String::as_str), same_domain)
}

// Returns the text of the first heading (ATX "# Title" or setext
// "Title\n====="), or "" if the document has none
//
// Headings come from the parser, so "# comment" lines inside fenced code
// blocks and "#hashtag" paragraphs are not mistaken for titles.
pub fn extract_markdown_title(markdown: &str) -> String {
    let mut title = String::new();
    let mut in_heading = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) => in_heading = true,
            Event::End(Tag::Heading(..)) => break,
            Event::Text(text) | Event::Code(text) if in_heading => title.push_str(&text),
            Event::SoftBreak | Event::HardBreak if in_heading => title.push(' '),
            _ => {}
        }
    }

    title.trim().to_string()
}

// Parses a URL given on the command line into the same form the
// extractors produce for links (e.g. "http://host" -> "http://host/")
//
// Start URLs must go through this, otherwise the start page and the links
// pointing back at it are two different keys and it gets fetched twice.
pub fn normalize_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    url.set_fragment(None);
    Ok(url)
}

// Resolves, filters and de-duplicates raw hrefs
fn collect_links<'a>(
    base: &Url,
    hrefs: impl Iterator<Item = &'a str>,
    same_domain: Option<&str>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let Some(url) = resolve_link(base, href) else {
            continue;
        };

        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }

        if let Some(domain) = same_domain {
            if url.domain() != Some(domain) {
                continue;
            }
        }

        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip in-page anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why drop the fragment?
//    - "page#intro" and "page#usage" are the same document
//    - Without this, the crawler would fetch one page under many names
//
// 2. Why de-duplicate per page?
//    - Navigation bars often link the same page several times
//    - Each copy would only turn into an "already crawled" line
//
// 3. What does base.join() do?
//    - Resolves an href the way a browser does
//    - "https://example.com/page/" + "../about" = "https://example.com/about"
//    - An absolute href simply replaces the base
// -----------------------------------------------------------------------------
