//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs with an `EnvFilter`
//! - **Request Tracing**: every request runs in a span carrying its request ID
//!
//! ## Usage
//!
//! ```rust,no_run
//! use axum::Router;
//! use nodeboard_node::observability::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router = Router::new()
//!     .layer(axum::middleware::from_fn(request_id_middleware));
//! ```

mod logging;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_middleware, REQUEST_ID_HEADER};
