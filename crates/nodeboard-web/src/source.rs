//! Where the dataset comes from.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
};
use nodeboard_edge::AssetStore;
use nodeboard_types::Dataset;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::LoadError;

/// Default dataset path inside the site.
pub const DEFAULT_DATASET_PATH: &str = "/nodes.json";

/// Upper bound on the dataset document size.
pub const MAX_DATASET_BYTES: usize = 16 * 1024 * 1024;

/// A single-shot dataset fetch.
#[async_trait]
pub trait DatasetSource: Send + Sync + 'static {
    /// Fetches and decodes the whole dataset.
    async fn fetch(&self) -> Result<Dataset, LoadError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: DatasetSource + ?Sized> DatasetSource for Arc<T> {
    async fn fetch(&self) -> Result<Dataset, LoadError> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Reads the dataset through an asset store, as a page would.
pub struct AssetSource<A> {
    assets: A,
    path: String,
}

impl<A: AssetStore> AssetSource<A> {
    /// Creates a source reading [`DEFAULT_DATASET_PATH`].
    pub fn new(assets: A) -> Self {
        Self::with_path(assets, DEFAULT_DATASET_PATH)
    }

    /// Creates a source reading `path`.
    pub fn with_path(assets: A, path: impl Into<String>) -> Self {
        Self {
            assets,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<A: AssetStore> DatasetSource for AssetSource<A> {
    async fn fetch(&self) -> Result<Dataset, LoadError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.path.as_str())
            .body(Body::empty())
            .map_err(|e| LoadError::Body(e.to_string()))?;

        let response = self.assets.fetch(request).await?;
        if !response.status().is_success() {
            return Err(LoadError::Status(response.status().as_u16()));
        }

        let bytes = axum::body::to_bytes(response.into_body(), MAX_DATASET_BYTES)
            .await
            .map_err(|e| LoadError::Body(e.to_string()))?;
        Ok(Dataset::from_json(&bytes)?)
    }

    fn describe(&self) -> String {
        format!("asset {}", self.path)
    }
}

/// Fetches the dataset from a remote URL.
#[derive(Clone)]
pub struct HttpSource {
    url: String,
    http: Client,
    max_bytes: usize,
}

impl HttpSource {
    /// Creates a source for `url` with a request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        Ok(Self {
            url: url.into(),
            http: Client::builder().timeout(timeout).build()?,
            max_bytes: MAX_DATASET_BYTES,
        })
    }

    /// Overrides the body size limit.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Dataset, LoadError> {
        let mut res = self.http.get(&self.url).send().await?;

        if !res.status().is_success() {
            return Err(LoadError::Status(res.status().as_u16()));
        }

        if res
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(LoadError::TooLarge(self.max_bytes));
        }

        // Content-Length may be absent or wrong; count what actually arrives.
        let mut body = Vec::new();
        while let Some(chunk) = res.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(LoadError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(Dataset::from_json(&body)?)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// Reads the dataset from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Dataset, LoadError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(Dataset::from_json(&bytes)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
