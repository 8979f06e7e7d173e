//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use pagewalk::{run_crawl, CrawlOptions, PageStatus, Report};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates test options for a mock server root
fn test_options(root: &str, depth: u32) -> CrawlOptions {
    let mut options = CrawlOptions::new(root);
    options.depth = depth;
    options.timeout = Duration::from_secs(5);
    options
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

async fn crawl(options: CrawlOptions) -> Report {
    run_crawl(options, CancellationToken::new())
        .await
        .expect("crawl should produce a report")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head>
            <title>Home</title>
            <meta name="description" content="Welcome">
        </head><body>
            <h1>Hello</h1>
            <a href="/about">About</a>
            <a href="/missing">Missing</a>
            <img src="/logo.png">
        </body></html>"#,
    )
    .await;
    mount_html(&server, "/about", "<html><head></head><body>About</body></html>").await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 12345]))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(test_options(&base_url, 3)).await;

    assert_eq!(report.root_url, format!("{}/", base_url));
    let urls: Vec<_> = report.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/about", base_url),
            format!("{}/missing", base_url),
        ]
    );

    let root = report.page(&format!("{}/", base_url)).unwrap();
    assert_eq!(root.status, PageStatus::Ok);
    assert_eq!(root.http_status, 200);
    assert_eq!(root.depth, 0);
    assert_eq!(root.seo.title.as_deref(), Some("Home"));
    assert_eq!(root.seo.description.as_deref(), Some("Welcome"));
    assert!(root.seo.has_h1);

    let broken = root.broken_links.as_ref().unwrap();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].url, format!("{}/missing", base_url));
    assert_eq!(broken[0].status_code, Some(404));

    let assets = root.assets.as_ref().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].status_code, 200);
    assert_eq!(assets[0].size_bytes, 12345);

    let about = report.page(&format!("{}/about", base_url)).unwrap();
    assert_eq!(about.depth, 1);
    assert!(!about.seo.has_title);
    assert_eq!(about.seo.title, None);

    let missing = report.page(&format!("{}/missing", base_url)).unwrap();
    assert_eq!(missing.status, PageStatus::ClientError);
    assert_eq!(missing.http_status, 404);
}

#[tokio::test]
async fn test_depth_zero_yields_only_root() {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<a href="/next">next</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("next"))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(test_options(&server.uri(), 0)).await;
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.depth, 0);
}

#[tokio::test]
async fn test_unreachable_root_reports_error_page() {
    // Bind then drop a listener to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let root = format!("http://127.0.0.1:{}", port);

    let report = crawl(test_options(&root, 2)).await;
    assert_eq!(report.pages.len(), 1);

    let value: Value = serde_json::from_str(&report.to_json(false).unwrap()).unwrap();
    let page = &value["pages"][0];
    assert_eq!(page["status"], json!("error"));
    assert_eq!(page["http_status"], json!(0));
    assert!(page["error"].is_string());
    assert_eq!(page["broken_links"], Value::Null);
    assert_eq!(page["assets"], Value::Null);
}

#[tokio::test]
async fn test_ignored_schemes_and_duplicates() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r##"<a href="mailto:me@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="tel:123">tel</a>
            <a href="#top">top</a>
            <a href="/a">a</a>
            <a href="/a#section">a again</a>
            <a href="/a">a thrice</a>"##,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/">home</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(test_options(&server.uri(), 5)).await;
    assert_eq!(report.pages.len(), 2);
    for page in &report.pages {
        assert_eq!(page.broken_links.as_deref(), Some(&[][..]));
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let mut options = test_options(&server.uri(), 2);
    options.retries = 2;
    let report = crawl(options).await;

    let page = &report.pages[0];
    assert_eq!(page.status, PageStatus::ServerError);
    assert_eq!(page.http_status, 503);
    assert_eq!(page.error, None);
}

#[tokio::test]
async fn test_assets_fetched_once_per_crawl() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/style.css"><a href="/a">a</a>"#,
    )
    .await;
    mount_html(&server, "/a", r#"<link rel="stylesheet" href="/style.css">"#).await;

    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"body{}".to_vec(), "text/css"))
        .expect(1)
        .mount(&server)
        .await;

    // One worker so the second page is checked after the first is cached
    let mut options = test_options(&server.uri(), 3);
    options.workers = 1;
    let report = crawl(options).await;

    assert_eq!(report.pages.len(), 2);
    for page in &report.pages {
        let assets = page.assets.as_ref().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].size_bytes, 6);
    }
}

#[tokio::test]
async fn test_delay_paces_requests() {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_html(&server, "/a", "leaf").await;

    let mut options = test_options(&server.uri(), 3);
    options.delay = Duration::from_millis(100);

    let start = Instant::now();
    let report = crawl(options).await;

    // GET /, HEAD /a, GET /a
    assert_eq!(report.pages.len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_report_json_shape() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html><head><title></title></head></html>").await;

    let report = crawl(test_options(&server.uri(), 1)).await;
    let value: Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();

    assert_eq!(value["depth"], json!(1));
    let page = &value["pages"][0];
    assert_eq!(page["status"], json!("ok"));
    assert_eq!(page["error"], Value::Null);
    assert_eq!(page["seo"]["has_title"], json!(true));
    assert_eq!(page["seo"]["title"], json!(""));
    assert_eq!(page["seo"]["has_description"], json!(false));
    assert_eq!(page["seo"]["description"], Value::Null);
    assert_eq!(page["broken_links"], json!([]));
    assert_eq!(page["assets"], json!([]));

    let generated_at = value["generated_at"].as_str().unwrap();
    assert!(generated_at.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(generated_at).is_ok());
}

#[tokio::test]
async fn test_cancelled_crawl_returns_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("home"))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run_crawl(test_options(&server.uri(), 3), cancel)
        .await
        .unwrap();
    assert!(report.pages.is_empty());
}

#[tokio::test]
async fn test_invalid_root_is_fatal() {
    let result = run_crawl(CrawlOptions::new("http://"), CancellationToken::new()).await;
    assert!(result.is_err());
}
