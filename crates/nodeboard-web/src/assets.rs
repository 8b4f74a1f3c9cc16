//! Serves the rendered node browser as the site's entry document.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Query,
    http::{Method, Request, Response, Uri},
    response::{Html, IntoResponse},
};
use nodeboard_edge::{AssetStore, EdgeError, DEFAULT_ENTRY_DOCUMENT};
use std::sync::Arc;

use crate::browser::NodeBrowser;
use crate::page::{render_page, PageQuery, PageState};
use crate::refresh::ViewActivity;
use crate::source::DatasetSource;

/// Asset store that renders the entry document from the browser state and
/// delegates every other path to the wrapped store.
pub struct BrowserAssets<A, S> {
    inner: A,
    browser: Arc<NodeBrowser<S>>,
    entry_document: String,
    activity: Option<ViewActivity>,
}

impl<A: AssetStore, S: DatasetSource> BrowserAssets<A, S> {
    pub fn new(inner: A, browser: Arc<NodeBrowser<S>>) -> Self {
        Self {
            inner,
            browser,
            entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
            activity: None,
        }
    }

    /// Sets the path rendered as the page.
    pub fn with_entry_document(mut self, path: impl Into<String>) -> Self {
        self.entry_document = path.into();
        self
    }

    /// Records every page render as a view.
    pub fn with_activity(mut self, activity: ViewActivity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn browser(&self) -> &Arc<NodeBrowser<S>> {
        &self.browser
    }

    fn is_page(&self, request: &Request<Body>) -> bool {
        (request.method() == Method::GET || request.method() == Method::HEAD)
            && request.uri().path() == self.entry_document
    }

    async fn render(&self, uri: &Uri) -> Result<Response<Body>, EdgeError> {
        let query = match Query::<PageQuery>::try_from_uri(uri) {
            Ok(Query(query)) => query,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed page query");
                PageQuery::default()
            }
        };

        if let Some(activity) = &self.activity {
            activity.record_view();
        }

        if let Some(action) = query.action() {
            let outcome = self.browser.load().await;
            tracing::debug!(?action, ?outcome, "User-triggered reload");
        }

        let state = PageState::new(self.browser.phase(), query.filter()).with_notice(query.notice());
        let html = render_page(&state)?;
        Ok(Html(html).into_response())
    }
}

#[async_trait]
impl<A: AssetStore, S: DatasetSource> AssetStore for BrowserAssets<A, S> {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, EdgeError> {
        if self.is_page(&request) {
            self.render(request.uri()).await
        } else {
            self.inner.fetch(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::AssetSource;
    use axum::http::StatusCode;
    use nodeboard_edge::MemoryAssetStore;

    const DOC: &str = r#"{"nodes":[{"name":"alpha","country":"US","city":"NYC","host":"1.2.3.4","port":443,"link":"vmess://a","latency":42}]}"#;

    fn page_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assets() -> (MemoryAssetStore, BrowserAssets<MemoryAssetStore, AssetSource<MemoryAssetStore>>) {
        let store = MemoryAssetStore::new()
            .with_file("/index.html", "<p>static shell</p>")
            .with_file("/style.css", "body {}");
        let browser = Arc::new(NodeBrowser::new(AssetSource::new(store.clone())));
        (store.clone(), BrowserAssets::new(store, browser))
    }

    #[tokio::test]
    async fn test_entry_document_is_rendered() {
        let (store, assets) = assets();
        store.insert("/nodes.json", DOC);
        assets.browser().load().await;

        let response = assets.fetch(page_request("/index.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("alpha"));
        assert!(!html.contains("static shell"));
    }

    #[tokio::test]
    async fn test_other_paths_delegate() {
        let (_store, assets) = assets();
        let response = assets.fetch(page_request("/style.css")).await.unwrap();
        assert_eq!(body_text(response).await, "body {}");
    }

    #[tokio::test]
    async fn test_refresh_action_loads() {
        let (store, assets) = assets();
        store.insert("/nodes.json", DOC);
        assert!(assets.browser().phase().is_loading());

        let response = assets
            .fetch(page_request("/index.html?action=refresh"))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("alpha"));
        assert!(assets.browser().phase().dataset().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_records_view() {
        let (_store, assets) = assets();
        let activity = ViewActivity::new(std::time::Duration::from_secs(60));
        let assets = assets.with_activity(activity.clone());

        assets.fetch(page_request("/index.html")).await.unwrap();
        assert!(crate::refresh::Visibility::is_visible(&activity));
    }
}
