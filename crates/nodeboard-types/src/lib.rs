//! Common types used throughout `nodeboard`.
//!
//! This crate provides the canonical node and dataset records, the adapter
//! that normalises both observed `nodes.json` layouts into them, and the
//! latency tiers used for presentation.

mod dataset;
mod error;
mod latency;
mod wire;

pub use dataset::{Dataset, Node, ProbeOrigin};
pub use error::DatasetError;
pub use latency::LatencyTier;

/// Country value written by the measurement pipeline when geo lookup failed.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Display text for optional fields that are absent.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Name given to nodes that arrive without one.
pub const UNNAMED_NODE: &str = "Unnamed node";

/// Badge text for a node without a latency measurement.
pub const UNMEASURED_LATENCY: &str = "--";
