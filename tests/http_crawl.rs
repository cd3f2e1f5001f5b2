use link_crawler::fetch::normalize_url;
use link_crawler::{crawl, FetchError, Fetcher, HttpFetcher, HttpFetcherConfig, OutputFormat};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct Lines(Arc<Mutex<Vec<u8>>>);

impl Lines {
    fn get(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
    }
}

impl Write for Lines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_html_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><head><title>Home</title></head>
           <body><a href="/about">About</a><a href="https://other.example/">Other</a></body></html>"#,
    )
    .await;

    let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
    let page = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(page.body, "Home");
    assert_eq!(
        page.urls,
        vec![format!("{}/about", server.uri()), "https://other.example/".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_markdown_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/README.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("# Docs\n\nSee the [guide](guide.md)."),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
    let page = fetcher
        .fetch(&format!("{}/docs/README.md", server.uri()))
        .await
        .unwrap();

    assert_eq!(page.body, "Docs");
    assert_eq!(page.urls, vec![format!("{}/docs/guide.md", server.uri())]);
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/gone", server.uri());
    let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(err, FetchError::Status { url: url.clone(), status: 404 });
    assert_eq!(err.to_string(), format!("HTTP 404 fetching {}", url));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawl_mock_site() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<title>Home</title><a href="/a">A</a><a href="/b">B</a><a href="/missing">M</a>"#,
    )
    .await;
    mount_html(&server, "/a", r#"<title>A</title><a href="/">Home</a><a href="/b">B</a>"#).await;
    mount_html(&server, "/b", r#"<title>B</title><a href="/">Home</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = server.uri();
    let fetcher = Arc::new(HttpFetcher::new(HttpFetcherConfig::default()).unwrap());
    let lines = Lines::default();

    // Depth 4 keeps every link above the depth limit whichever task claims it
    let summary = crawl(fetcher, &format!("{}/", base), 4, lines.clone(), OutputFormat::Text)
        .await
        .unwrap();

    let lines = lines.get();
    assert_eq!(summary.found, 3);
    assert_eq!(summary.failed, 1);
    // a->/, a->/b, b->/
    assert_eq!(summary.already_crawled, 3);
    assert_eq!(lines.len(), summary.total());
    assert!(lines.contains(&format!("found: {}/ \"Home\"", base)));
    assert!(lines.contains(&format!("HTTP 404 fetching {}/missing", base)));

    // Each page was requested exactly once
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_same_domain_filter() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<a href="/local">Local</a><a href="https://rust-lang.org/">External</a>"#,
    )
    .await;

    let config = HttpFetcherConfig {
        same_domain: Some("rust-lang.org".to_string()),
        ..HttpFetcherConfig::default()
    };
    let fetcher = HttpFetcher::new(config).unwrap();
    let page = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();

    // The mock server lives on 127.0.0.1, which has no domain at all
    assert_eq!(page.urls, vec!["https://rust-lang.org/".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_start_url_without_trailing_slash_fetched_once() {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<title>Home</title><a href="/">Self</a><a href="/a">A</a>"#).await;
    mount_html(&server, "/a", r#"<title>A</title><a href="/">Home</a>"#).await;

    // server.uri() has no trailing slash; links back to the home page do
    let raw = server.uri();
    assert!(!raw.ends_with('/'));
    let start = normalize_url(&raw).unwrap();
    assert_eq!(start.as_str(), format!("{}/", raw));

    let fetcher = Arc::new(HttpFetcher::new(HttpFetcherConfig::default()).unwrap());
    let lines = Lines::default();
    let summary = crawl(fetcher, start.as_str(), 3, lines.clone(), OutputFormat::Text)
        .await
        .unwrap();

    assert_eq!(summary.found, 2);
    // /->/ and /a->/
    assert_eq!(summary.already_crawled, 2);
    assert_eq!(lines.get().len(), summary.total());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let home = requests.iter().filter(|r| r.url.path() == "/").count();
    assert_eq!(home, 1);
}

#[tokio::test]
async fn test_slow_response_is_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<title>Slow</title>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = HttpFetcherConfig {
        timeout: Duration::from_millis(200),
        ..HttpFetcherConfig::default()
    };
    let url = format!("{}/slow", server.uri());
    let fetcher = HttpFetcher::new(config).unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(err, FetchError::Timeout(url.clone()));
    assert_eq!(err.to_string(), format!("timed out fetching {}", url));
}

#[tokio::test]
async fn test_closed_port_is_connect_error() {
    // Grab a free port, then close it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/", port);

    let fetcher = HttpFetcher::new(HttpFetcherConfig::default()).unwrap();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(&err, FetchError::Connect { url: u, .. } if *u == url), "got {:?}", err);
    assert!(err.to_string().starts_with(&format!("connection failed for {}", url)));
}
