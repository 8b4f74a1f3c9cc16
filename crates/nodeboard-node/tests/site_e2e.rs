//! End-to-end tests for a served site (routing, page rendering, middleware).

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use nodeboard_edge::{AssetStore, EdgeError, EdgeRouter, StaticMatcher};
use nodeboard_node::{build_app, Config, Site};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NODES: &str = r#"{
    "updated_at": "2024-05-01 10:00:00",
    "runner_ip": {"query": "198.51.100.7", "country": "Japan", "city": "Tokyo"},
    "nodes": [
        {"name": "tokyo-1", "protocol": "vmess", "country": "Japan", "city": "Tokyo",
         "isp": "Example Net", "host": "10.0.0.1", "port": 443,
         "link": "vmess://tokyo-1", "latency": 42},
        {"name": "berlin-1", "protocol": "ss", "country": "Germany", "city": "Berlin",
         "host": "10.0.0.2", "port": "8388", "link": "ss://berlin-1", "latency": 180}
    ]
}"#;

fn write_site(dir: &Path, with_dataset: bool) {
    std::fs::write(dir.join("index.html"), "<html>static shell</html>").unwrap();
    std::fs::write(dir.join("style.css"), "body { color: #fff; }").unwrap();
    std::fs::write(dir.join("app.js"), "console.log('hi');").unwrap();
    if with_dataset {
        std::fs::write(dir.join("nodes.json"), NODES).unwrap();
    }
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        site_dir: dir.path().to_path_buf(),
        ..Config::default()
    }
}

async fn loaded_site(with_dataset: bool) -> (TempDir, Site) {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), with_dataset);
    let site = Site::from_config(&test_config(&dir)).unwrap();
    site.browser.load().await;
    (dir, site)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

// ==================== Routing ====================

#[tokio::test]
async fn test_static_file_served_verbatim() {
    let (_dir, site) = loaded_site(true).await;

    let response = site.app().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "public, max-age=86400");
    assert_eq!(response.headers()["vary"], "Accept-Encoding");
    assert_eq!(text_body(response).await, "console.log('hi');");
}

#[tokio::test]
async fn test_navigational_path_renders_page() {
    let (_dir, site) = loaded_site(true).await;

    let response = site.app().oneshot(get("/dashboard/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-cache");

    let html = text_body(response).await;
    assert!(!html.contains("static shell"));
    assert_eq!(html.matches("class=\"node-card\"").count(), 2);
    assert!(html.contains("198.51.100.7"));
    assert!(html.contains("Location: Japan - Tokyo"));
    assert!(html.contains("10.0.0.2:8388"));
}

#[tokio::test]
async fn test_country_filter_from_query() {
    let (_dir, site) = loaded_site(true).await;

    let html = text_body(site.app().oneshot(get("/?country=Germany")).await.unwrap()).await;
    assert_eq!(html.matches("class=\"node-card\"").count(), 1);
    assert!(html.contains("berlin-1"));
    assert!(!html.contains("tokyo-1"));

    let html = text_body(site.app().oneshot(get("/?country=France")).await.unwrap()).await;
    assert_eq!(html.matches("class=\"node-card\"").count(), 0);
    assert!(html.contains("No nodes found in France"));
}

#[tokio::test]
async fn test_search_from_query() {
    let (_dir, site) = loaded_site(true).await;

    let html = text_body(site.app().oneshot(get("/?q=EXAMPLE")).await.unwrap()).await;
    assert_eq!(html.matches("class=\"node-card\"").count(), 1);
    assert!(html.contains("tokyo-1"));
}

#[tokio::test]
async fn test_quick_test_notice() {
    let (_dir, site) = loaded_site(true).await;

    let html = text_body(site.app().oneshot(get("/?test=10.0.0.1:443")).await.unwrap()).await;
    assert!(html.contains("Quick test for 10.0.0.1:443"));
}

#[tokio::test]
async fn test_dataset_cache_headers() {
    let (_dir, site) = loaded_site(true).await;

    let response = site.app().oneshot(get("/nodes.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["cache-control"],
        "public, max-age=60, must-revalidate"
    );
}

#[tokio::test]
async fn test_preflight_and_api() {
    let (_dir, site) = loaded_site(true).await;

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/anything")
        .body(Body::empty())
        .unwrap();
    let response = site.app().oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.headers().get("cache-control").is_none());

    let response = site.app().oneshot(get("/api/anything")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("cache-control").is_none());
}

#[tokio::test]
async fn test_missing_static_file_is_404() {
    let (_dir, site) = loaded_site(true).await;

    let response = site.app().oneshot(get("/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Dataset states ====================

#[tokio::test]
async fn test_missing_dataset_then_retry() {
    let (dir, site) = loaded_site(false).await;
    assert!(site.browser.phase().is_error());

    let html = text_body(site.app().oneshot(get("/")).await.unwrap()).await;
    assert!(html.contains("retry-btn"));
    assert!(html.contains("HTTP 404"));

    std::fs::write(dir.path().join("nodes.json"), NODES).unwrap();

    let html = text_body(site.app().oneshot(get("/?action=retry")).await.unwrap()).await;
    assert!(!html.contains("retry-btn"));
    assert_eq!(html.matches("class=\"node-card\"").count(), 2);
}

#[tokio::test]
async fn test_remote_dataset_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NODES))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path(), false);
    let mut config = test_config(&dir);
    config.dataset.url = Some(format!("{}/nodes.json", server.uri()));

    let site = Site::from_config(&config).unwrap();
    site.browser.load().await;

    let html = text_body(site.app().oneshot(get("/")).await.unwrap()).await;
    assert_eq!(html.matches("class=\"node-card\"").count(), 2);
}

// ==================== Middleware ====================

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let (_dir, site) = loaded_site(true).await;

    let request = Request::builder()
        .uri("/style.css")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = site.app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");

    let response = site.app().oneshot(get("/style.css")).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

struct PanickingStore;

#[async_trait]
impl AssetStore for PanickingStore {
    async fn fetch(&self, _request: Request<Body>) -> Result<Response<Body>, EdgeError> {
        panic!("asset store exploded at /srv/secret");
    }
}

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    let app = build_app(
        Arc::new(EdgeRouter::new(PanickingStore)),
        StaticMatcher::default(),
    );

    let response = app.oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = text_body(response).await;
    assert_eq!(body, "Internal Server Error");
    assert!(!body.contains("/srv/secret"));
}

#[test]
fn test_invalid_matcher_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        static_matcher: "regex".into(),
        ..test_config(&dir)
    };
    assert!(Site::from_config(&config).is_err());
}
