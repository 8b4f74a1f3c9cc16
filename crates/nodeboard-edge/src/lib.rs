//! Nodeboard Edge Router
//!
//! Routes every inbound request either to an asset store or to the
//! single-page entry document:
//! - CORS preflight answered inline
//! - `/api/` namespace reserved (always 404)
//! - Static files passed through verbatim
//! - Everything else rewritten to the entry document
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nodeboard_edge::{edge_routes, DirAssetStore, EdgeRouter};
//!
//! let router = EdgeRouter::new(DirAssetStore::new("./site"));
//! let app: axum::Router = edge_routes(Arc::new(router));
//! ```

pub mod cors;
pub mod error;
pub mod matcher;
pub mod router;
pub mod store;

pub use error::{internal_error_response, EdgeError};
pub use matcher::StaticMatcher;
pub use router::{edge_routes, EdgeRouter, Route, DEFAULT_ENTRY_DOCUMENT};
pub use store::{AssetStore, DirAssetStore, MemoryAssetStore};
