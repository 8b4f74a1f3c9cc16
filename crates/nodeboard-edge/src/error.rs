//! Error types for the edge router.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Edge router errors.
///
/// None of these reach the client in detail; every variant renders as the
/// same generic 500 response.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// The asset store failed to produce a response.
    #[error("asset store error: {0}")]
    Asset(String),

    /// A rewritten request URI could not be built.
    #[error("invalid uri: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    /// A header value could not be encoded.
    #[error("invalid header: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),

    /// Building a request or response failed.
    #[error("http error: {0}")]
    Http(#[from] axum::http::Error),
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        internal_error_response()
    }
}

/// The generic server-error response: plain text, permissive origin.
pub fn internal_error_response() -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Body::from("Internal Server Error"))
        .into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
