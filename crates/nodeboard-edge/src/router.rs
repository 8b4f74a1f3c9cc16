//! Request classification and delegation.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;

use crate::cors::{api_not_found, preflight_response};
use crate::error::EdgeError;
use crate::matcher::StaticMatcher;
use crate::store::AssetStore;

/// Document served for every navigational path.
pub const DEFAULT_ENTRY_DOCUMENT: &str = "/index.html";

/// Namespace reserved for future endpoints.
const API_PREFIX: &str = "/api/";

/// How a request will be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight, answered inline.
    Preflight,
    /// Reserved API namespace, always 404.
    Api,
    /// Static file, passed through verbatim.
    Asset,
    /// Navigational path, served the entry document.
    Fallback,
}

/// Stateless edge router over an asset store.
pub struct EdgeRouter<A> {
    assets: A,
    matcher: StaticMatcher,
    entry_document: String,
}

impl<A: AssetStore> EdgeRouter<A> {
    /// Creates a router with the default matcher and entry document.
    pub fn new(assets: A) -> Self {
        Self {
            assets,
            matcher: StaticMatcher::default(),
            entry_document: DEFAULT_ENTRY_DOCUMENT.to_string(),
        }
    }

    /// Sets the static-file matcher.
    pub fn with_matcher(mut self, matcher: StaticMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sets the entry document path.
    pub fn with_entry_document(mut self, path: impl Into<String>) -> Self {
        self.entry_document = path.into();
        self
    }

    /// The wrapped asset store.
    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Entry document path.
    pub fn entry_document(&self) -> &str {
        &self.entry_document
    }

    /// Classifies a request without touching the asset store.
    pub fn classify(&self, method: &Method, path: &str) -> Route {
        if method == Method::OPTIONS {
            Route::Preflight
        } else if path.starts_with(API_PREFIX) {
            Route::Api
        } else if self.matcher.is_static(path) {
            Route::Asset
        } else {
            Route::Fallback
        }
    }

    /// Handles one request. Always produces a response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.route(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, %method, %path, "Edge router fault");
                e.into_response()
            }
        }
    }

    async fn route(&self, request: Request<Body>) -> Result<Response, EdgeError> {
        let route = self.classify(request.method(), request.uri().path());
        tracing::trace!(?route, uri = %request.uri(), "Classified request");

        match route {
            Route::Preflight => Ok(preflight_response(request.headers())),
            Route::Api => Ok(api_not_found()),
            Route::Asset => self.assets.fetch(request).await,
            Route::Fallback => {
                let request = self.entry_request(request)?;
                self.assets.fetch(request).await
            }
        }
    }

    /// Rewrites a navigational request onto the entry document, keeping the
    /// query string, headers and body.
    fn entry_request(&self, request: Request<Body>) -> Result<Request<Body>, EdgeError> {
        let (mut parts, body) = request.into_parts();

        let target = match parts.uri.query() {
            Some(query) => format!("{}?{}", self.entry_document, query),
            None => self.entry_document.clone(),
        };
        parts.uri = target.parse::<Uri>()?;
        if parts.method != Method::HEAD {
            parts.method = Method::GET;
        }

        Ok(Request::from_parts(parts, body))
    }
}

/// Create the edge router service: every method and path goes through
/// [`EdgeRouter::handle`].
pub fn edge_routes<A>(router: Arc<EdgeRouter<A>>) -> Router
where
    A: AssetStore,
{
    Router::new()
        .fallback(edge_handler::<A>)
        .with_state(router)
}

async fn edge_handler<A: AssetStore>(
    State(router): State<Arc<EdgeRouter<A>>>,
    request: Request,
) -> Response {
    router.handle(request).await
}
