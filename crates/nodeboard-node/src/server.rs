//! Wires configuration, the node browser and the edge router into one app.

use axum::{middleware, response::Response, Router};
use nodeboard_edge::{
    edge_routes, internal_error_response, AssetStore, DirAssetStore, EdgeRouter, StaticMatcher,
};
use nodeboard_web::{
    AssetSource, BrowserAssets, DatasetSource, HttpSource, LoadError, NodeBrowser, ViewActivity,
};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::cache::cache_control_layer;
use crate::config::{Config, ConfigError};
use crate::observability::request_id_middleware;

/// Dataset source chosen by configuration.
pub type SharedSource = Arc<dyn DatasetSource>;

/// Site files with the page rendered in place of the entry document.
pub type SiteAssets = BrowserAssets<DirAssetStore, SharedSource>;

/// Startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create dataset source: {0}")]
    Source(#[from] LoadError),
}

/// Everything the binary runs.
pub struct Site {
    pub browser: Arc<NodeBrowser<SharedSource>>,
    pub activity: ViewActivity,
    pub router: Arc<EdgeRouter<SiteAssets>>,
    pub matcher: StaticMatcher,
}

impl Site {
    /// Builds the site described by `config`. Nothing is fetched yet.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let matcher = config.matcher()?;
        let store = DirAssetStore::new(&config.site_dir);
        let source = dataset_source(config, store.clone())?;
        tracing::info!(source = %source.describe(), "Dataset source configured");

        let browser = Arc::new(NodeBrowser::new(source));
        let activity = ViewActivity::new(config.refresh_interval());
        let assets = BrowserAssets::new(store, browser.clone())
            .with_entry_document(config.entry_document.clone())
            .with_activity(activity.clone());

        let router = EdgeRouter::new(assets)
            .with_matcher(matcher)
            .with_entry_document(config.entry_document.clone());

        Ok(Self {
            browser,
            activity,
            router: Arc::new(router),
            matcher,
        })
    }

    /// HTTP application for this site.
    pub fn app(&self) -> Router {
        build_app(self.router.clone(), self.matcher)
    }
}

/// Remote URL when configured, otherwise the dataset file inside the site.
pub fn dataset_source(config: &Config, store: DirAssetStore) -> Result<SharedSource, LoadError> {
    let source: SharedSource = match &config.dataset.url {
        Some(url) => Arc::new(HttpSource::new(url.clone(), config.dataset_timeout())?),
        None => Arc::new(AssetSource::with_path(store, config.dataset.path.clone())),
    };
    Ok(source)
}

/// Edge routes plus the middleware stack.
pub fn build_app<A: AssetStore>(router: Arc<EdgeRouter<A>>, matcher: StaticMatcher) -> Router {
    edge_routes(router)
        .layer(middleware::from_fn_with_state(matcher, cache_control_layer))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Request handler panicked");
    internal_error_response()
}
