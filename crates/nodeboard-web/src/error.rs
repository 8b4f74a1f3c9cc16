//! Error types for the node browser.

use nodeboard_edge::EdgeError;
use nodeboard_types::DatasetError;
use thiserror::Error;

/// Rendering errors.
#[derive(Debug, Error)]
pub enum WebError {
    /// Template rendering error.
    #[error("template error: {0}")]
    Template(String),

    /// Query string encoding error.
    #[error("query encoding error: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::Template(err.to_string())
    }
}

impl From<WebError> for EdgeError {
    fn from(err: WebError) -> Self {
        EdgeError::Asset(err.to_string())
    }
}

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset endpoint answered with a non-success status.
    #[error("dataset request returned HTTP {0}")]
    Status(u16),

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The asset store failed.
    #[error("asset store error: {0}")]
    Asset(#[from] EdgeError),

    /// The document exceeds the configured size limit.
    #[error("dataset larger than {0} bytes")]
    TooLarge(usize),

    /// Reading the response body failed.
    #[error("failed to read dataset body: {0}")]
    Body(String),

    /// Reading a local dataset file failed.
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be decoded.
    #[error(transparent)]
    Parse(#[from] DatasetError),
}

/// Clipboard write failures.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The clipboard refused the write.
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}
