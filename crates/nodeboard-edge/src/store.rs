//! Asset store capability and its implementations.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, Response, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::error::EdgeError;

/// Something that serves pre-built files by request path.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Serve `request`. A missing file is a normal (404) response, not an error.
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, EdgeError>;
}

#[async_trait]
impl<T: AssetStore + ?Sized> AssetStore for Arc<T> {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, EdgeError> {
        (**self).fetch(request).await
    }
}

/// Serves files from a directory on disk.
#[derive(Clone, Debug)]
pub struct DirAssetStore {
    root: PathBuf,
    serve: ServeDir,
}

impl DirAssetStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let serve = ServeDir::new(&root).append_index_html_on_directories(true);
        Self { root, serve }
    }

    /// Site root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, EdgeError> {
        let response = match self.serve.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        Ok(response.map(Body::new))
    }
}

/// In-memory asset store keyed by absolute request path.
#[derive(Clone, Default)]
pub struct MemoryAssetStore {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryAssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file. `path` must start with `/`.
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Builder form of [`MemoryAssetStore::insert`].
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns true if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, EdgeError> {
        let method = request.method().clone();
        if method != Method::GET && method != Method::HEAD {
            return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
        }

        let mut path = request.uri().path().to_string();
        if path.ends_with('/') {
            path.push_str("index.html");
        }

        let Some(contents) = self.files.read().get(&path).cloned() else {
            return Ok(StatusCode::NOT_FOUND.into_response());
        };

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        let length = contents.len();
        let body = if method == Method::HEAD {
            Body::empty()
        } else {
            Body::from(contents)
        };

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, HeaderValue::from_str(mime.as_ref())?)
            .header(header::CONTENT_LENGTH, length)
            .body(body)?;
        Ok(response)
    }
}
