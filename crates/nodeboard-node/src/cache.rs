//! Cache headers for site responses.
//!
//! The page is re-rendered from live state on every request, so navigational
//! paths and the entry document are never cached. The dataset may change on
//! every measurement run and is cached briefly; other static files for a day.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, Response},
    middleware::Next,
};
use nodeboard_edge::StaticMatcher;
use std::time::Duration;

/// Cache lifetime of the dataset document.
pub const DATA_MAX_AGE: Duration = Duration::from_secs(60);

/// Cache lifetime of other static files.
pub const STATIC_MAX_AGE: Duration = Duration::from_secs(86400);

/// Cache control directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheControl {
    /// Publicly cacheable for a duration.
    Public(Duration),
    /// Publicly cacheable, revalidated once stale.
    MustRevalidate(Duration),
    /// Always revalidate.
    NoCache,
}

impl CacheControl {
    /// Converts to a Cache-Control header value.
    pub fn to_header_value(&self) -> HeaderValue {
        let value = match self {
            CacheControl::Public(dur) => format!("public, max-age={}", dur.as_secs()),
            CacheControl::MustRevalidate(dur) => {
                format!("public, max-age={}, must-revalidate", dur.as_secs())
            }
            CacheControl::NoCache => return HeaderValue::from_static("no-cache"),
        };
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }

    /// Cache control for a request path, as classified by `matcher`.
    pub fn for_path(matcher: StaticMatcher, path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if !matcher.is_static(path) || lower.ends_with(".html") || lower.ends_with(".htm") {
            CacheControl::NoCache
        } else if lower.ends_with(".json") {
            CacheControl::MustRevalidate(DATA_MAX_AGE)
        } else {
            CacheControl::Public(STATIC_MAX_AGE)
        }
    }
}

/// Adds cache headers to a response.
pub fn add_cache_headers<B>(response: &mut Response<B>, cache_control: &CacheControl) {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, cache_control.to_header_value());
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
}

/// Middleware adding cache headers to successful GET and HEAD responses.
///
/// Install with `axum::middleware::from_fn_with_state(matcher, cache_control_layer)`.
pub async fn cache_control_layer(
    State(matcher): State<StaticMatcher>,
    request: Request,
    next: Next,
) -> axum::response::Response {
    let cacheable = matches!(*request.method(), Method::GET | Method::HEAD);
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    if cacheable && response.status().is_success() {
        add_cache_headers(&mut response, &CacheControl::for_path(matcher, &path));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_values() {
        assert_eq!(
            CacheControl::Public(Duration::from_secs(3600)).to_header_value(),
            "public, max-age=3600"
        );
        assert_eq!(
            CacheControl::MustRevalidate(DATA_MAX_AGE).to_header_value(),
            "public, max-age=60, must-revalidate"
        );
        assert_eq!(CacheControl::NoCache.to_header_value(), "no-cache");
    }

    #[test]
    fn test_for_path() {
        let m = StaticMatcher::Extensions;
        assert_eq!(CacheControl::for_path(m, "/"), CacheControl::NoCache);
        assert_eq!(CacheControl::for_path(m, "/dashboard/settings"), CacheControl::NoCache);
        assert_eq!(CacheControl::for_path(m, "/index.html"), CacheControl::NoCache);
        assert_eq!(
            CacheControl::for_path(m, "/nodes.json"),
            CacheControl::MustRevalidate(DATA_MAX_AGE)
        );
        assert_eq!(
            CacheControl::for_path(m, "/style.css"),
            CacheControl::Public(STATIC_MAX_AGE)
        );
    }

    #[test]
    fn test_for_path_follows_matcher() {
        // Unknown extension: navigational under the list, static under any-dot.
        assert_eq!(
            CacheControl::for_path(StaticMatcher::Extensions, "/worker.wasm"),
            CacheControl::NoCache
        );
        assert_eq!(
            CacheControl::for_path(StaticMatcher::AnyDot, "/worker.wasm"),
            CacheControl::Public(STATIC_MAX_AGE)
        );
    }
}
