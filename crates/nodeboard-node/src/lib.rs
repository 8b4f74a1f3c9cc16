//! # Nodeboard Node
//!
//! HTTP server for a nodeboard site: serves the pre-built static files,
//! renders the node browser as the entry document and keeps the dataset
//! fresh in the background.
//!
//! ```text
//!   request
//!      │
//!  request id ─▶ trace ─▶ catch panic ─▶ cache headers
//!      │
//!  edge router ──▶ preflight / api 404
//!      │
//!      ├── static path ──────▶ site directory
//!      └── navigational path ─▶ entry document ─▶ node browser page
//! ```

pub mod cache;
pub mod config;
pub mod observability;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, dataset_source, ServerError, Site};
