//! Node browser state machine.
//!
//! ```text
//! Loading ──ok──▶ Ready ──reload ok──▶ Ready
//!    │              │
//!   err          reload err
//!    ▼              ▼
//!  Error ◀──────────┘
//!    │
//!  retry ──▶ Loading
//! ```
//!
//! Overlapping loads are not deduplicated. Every load takes a ticket when it
//! starts and its result is applied only if no newer load has been applied
//! first, so the most recently issued load that completes wins.

use nodeboard_types::Dataset;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::source::DatasetSource;

/// Current dataset state.
#[derive(Debug, Clone)]
pub enum Phase {
    /// No dataset yet; a load is expected.
    Loading,
    /// Dataset loaded.
    Ready(Arc<Dataset>),
    /// The last applied load failed.
    Error(String),
}

impl Phase {
    /// Returns the dataset when ready.
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Phase::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Phase::Error(_))
    }
}

/// Result of a single [`NodeBrowser::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A dataset with this many nodes was applied.
    Ready(usize),
    /// The load failed and the browser is now in the error phase.
    Failed,
    /// A newer load was applied first; this result was dropped.
    Superseded,
}

struct Inner {
    phase: Phase,
    applied: u64,
}

/// Holds the loaded dataset and drives loads through a [`DatasetSource`].
pub struct NodeBrowser<S> {
    source: S,
    inner: RwLock<Inner>,
    issued: AtomicU64,
}

impl<S: DatasetSource> NodeBrowser<S> {
    /// Creates a browser in the loading phase. Nothing is fetched until
    /// [`NodeBrowser::load`] is called.
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: RwLock::new(Inner {
                phase: Phase::Loading,
                applied: 0,
            }),
            issued: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> Phase {
        self.inner.read().phase.clone()
    }

    /// The dataset source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the dataset once and applies the result.
    pub async fn load(&self) -> LoadOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut inner = self.inner.write();
            if inner.phase.is_error() {
                inner.phase = Phase::Loading;
            }
        }

        let result = self.source.fetch().await;

        let mut inner = self.inner.write();
        if ticket <= inner.applied {
            tracing::debug!(ticket, applied = inner.applied, "Dropping superseded dataset load");
            return LoadOutcome::Superseded;
        }
        inner.applied = ticket;

        match result {
            Ok(dataset) => {
                let count = dataset.len();
                tracing::info!(
                    nodes = count,
                    updated_at = dataset.updated_at.as_deref().unwrap_or("-"),
                    source = %self.source.describe(),
                    "Dataset loaded"
                );
                inner.phase = Phase::Ready(Arc::new(dataset));
                LoadOutcome::Ready(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, source = %self.source.describe(), "Dataset load failed");
                inner.phase = Phase::Error(e.to_string());
                LoadOutcome::Failed
            }
        }
    }
}
