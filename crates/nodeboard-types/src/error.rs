//! Dataset decoding errors.

use thiserror::Error;

/// Errors produced while decoding a dataset document.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid dataset document: {0}")]
    Parse(#[from] serde_json::Error),
}
