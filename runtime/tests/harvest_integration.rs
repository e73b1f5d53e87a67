//! End-to-end harvests against a local mock origin.
//!
//! Exercises the real reqwest-backed fetcher and the axum router, with
//! wiremock serving pages, stylesheets, and scripts.

use assert_json_diff::assert_json_include;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use page_harvest::config::HarvestConfig;
use page_harvest::harvest::Aggregator;
use page_harvest::rest;
use page_harvest::HarvestError;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ──

fn config(cap: usize) -> HarvestConfig {
    HarvestConfig {
        max_total_size: cap,
        fetch_timeout_ms: 2_000,
        ..HarvestConfig::default()
    }
}

async fn serve(server: &MockServer, at: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.into()))
        .mount(server)
        .await;
}

async fn scrape(app: axum::Router, url: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/scrape?url={url}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ── Aggregation ──

#[tokio::test]
async fn test_full_page_bundle() {
    let server = MockServer::start().await;
    let html = r#"<html><head>
        <link rel="stylesheet" href="/static/site.css">
        <script src="/static/app.js"></script>
        </head><body><script>window.ready = true;</script></body></html>"#;
    serve(&server, "/", html).await;
    serve(&server, "/static/site.css", "body { margin: 0 }").await;
    serve(&server, "/static/app.js", "console.log('hi')").await;

    let page = format!("{}/", server.uri());
    let bundle = Aggregator::with_http(config(150_000))
        .unwrap()
        .aggregate(&page)
        .await
        .unwrap();

    assert_eq!(bundle.html, html);
    assert_eq!(bundle.css_files.len(), 1);
    assert_eq!(bundle.css_files[0].url, format!("{}/static/site.css", server.uri()));
    assert_eq!(bundle.js_files.len(), 2);
    assert_eq!(bundle.js_files[0].content, "console.log('hi')");
    assert_eq!(bundle.js_files[1].src, "inline");
    assert_eq!(bundle.js_files[1].content, "window.ready = true;");
    assert_eq!(bundle.total_fetched_size, bundle.content_size());
}

#[tokio::test]
async fn test_sends_browser_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "harvest-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = HarvestConfig {
        user_agent: "harvest-test/1.0".into(),
        ..config(1_000)
    };
    let bundle = Aggregator::with_http(cfg)
        .unwrap()
        .aggregate(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(bundle.html, "<p>ok</p>");
}

#[test]
fn test_invalid_user_agent_fails_construction() {
    let cfg = HarvestConfig {
        user_agent: "bad\nagent".into(),
        ..config(1_000)
    };
    let err = Aggregator::with_http(cfg).err().unwrap();
    assert!(format!("{err:#}").contains("user agent"));
}

#[tokio::test]
async fn test_redirect_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    serve(&server, "/new", "<p>moved</p>").await;

    let bundle = Aggregator::with_http(config(1_000))
        .unwrap()
        .aggregate(&format!("{}/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(bundle.html, "<p>moved</p>");
}

#[tokio::test]
async fn test_missing_stylesheet_skipped() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        r#"<link rel="stylesheet" href="/gone.css"><link rel="stylesheet" href="/here.css">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone.css"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/here.css", "p{}").await;

    let bundle = Aggregator::with_http(config(10_000))
        .unwrap()
        .aggregate(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(bundle.css_files.len(), 1);
    assert!(bundle.css_files[0].url.ends_with("/here.css"));
}

#[tokio::test]
async fn test_cap_admits_two_of_three_stylesheets() {
    let server = MockServer::start().await;
    let html = r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="/b.css"><link rel="stylesheet" href="/c.css">"#;
    serve(&server, "/", html).await;
    for name in ["/a.css", "/b.css", "/c.css"] {
        serve(&server, name, "x".repeat(1_000)).await;
    }

    let cap = html.len() + 2_999;
    let bundle = Aggregator::with_http(config(cap))
        .unwrap()
        .aggregate(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(bundle.css_files.len(), 2);
    assert!(bundle.css_files[0].url.ends_with("/a.css"));
    assert!(bundle.css_files[1].url.ends_with("/b.css"));
    assert_eq!(bundle.total_fetched_size, html.len() + 2_000);
}

#[tokio::test]
async fn test_slow_script_times_out_and_is_skipped() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        r#"<script src="/slow.js"></script><script src="/fast.js"></script>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late()")
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&server)
        .await;
    serve(&server, "/fast.js", "fast()").await;

    let cfg = HarvestConfig {
        fetch_timeout_ms: 300,
        ..config(10_000)
    };
    let bundle = Aggregator::with_http(cfg)
        .unwrap()
        .aggregate(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(bundle.js_files.len(), 1);
    assert_eq!(bundle.js_files[0].content, "fast()");
}

#[tokio::test]
async fn test_primary_server_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = Aggregator::with_http(config(1_000))
        .unwrap()
        .aggregate(&format!("{}/", server.uri()))
        .await;
    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, HarvestError::PrimaryFetch(_)));
}

// ── REST boundary ──

#[tokio::test]
async fn test_scrape_endpoint_json_shape() {
    let server = MockServer::start().await;
    serve(&server, "/", "<script></script>").await;

    let app = rest::router(Arc::new(Aggregator::with_http(config(1_000)).unwrap()));
    let page = format!("{}/", server.uri());
    let (status, body) = scrape(app, &page).await;

    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: body,
        expected: json!({
            "url": page,
            "html": "<script></script>",
            "css_files": [],
            "js_files": [{ "src": "inline", "content": "" }],
            "total_fetched_size": 17
        })
    );
}

#[tokio::test]
async fn test_scrape_endpoint_rejects_ftp_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = rest::router(Arc::new(Aggregator::with_http(config(1_000)).unwrap()));
    let (status, body) = scrape(app, "ftp://example.com").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Invalid URL. Use http:// or https://" }));
}

#[tokio::test]
async fn test_scrape_endpoint_primary_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = rest::router(Arc::new(Aggregator::with_http(config(1_000)).unwrap()));
    let (status, body) = scrape(app, &format!("{}/", server.uri())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap_or_default();
    assert!(detail.starts_with("Error fetching URL: 404"), "{detail}");
}
