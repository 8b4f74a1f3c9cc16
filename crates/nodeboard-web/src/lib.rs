//! Nodeboard Node Browser
//!
//! Server-rendered view over the measured node dataset:
//! - Dataset loading with a loading/ready/error state machine
//! - Country and free-text filtering
//! - Node cards with latency tiers, copy-link and quick-test controls
//! - Periodic refresh while the page is being viewed
//!
//! The page is served as the site's entry document by wrapping an
//! [`AssetStore`](nodeboard_edge::AssetStore) in [`BrowserAssets`].

pub mod assets;
pub mod browser;
pub mod clipboard;
pub mod error;
pub mod filter;
pub mod page;
pub mod refresh;
pub mod source;
pub mod templates;

pub use assets::BrowserAssets;
pub use browser::{LoadOutcome, NodeBrowser, Phase};
pub use clipboard::{copy_link, Clipboard, CopyOutcome, MemoryClipboard};
pub use error::{ClipboardError, LoadError, WebError};
pub use filter::{country_options, visible_nodes, CountryFilter, FilterState};
pub use page::{build_page, render_page, PageAction, PageQuery, PageState};
pub use refresh::{spawn_refresh, AlwaysVisible, ViewActivity, Visibility, DEFAULT_REFRESH_INTERVAL};
pub use source::{AssetSource, DatasetSource, FileSource, HttpSource, DEFAULT_DATASET_PATH};
pub use templates::*;
