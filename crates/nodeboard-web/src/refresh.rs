//! Periodic dataset refresh.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::browser::NodeBrowser;
use crate::source::DatasetSource;

/// Default refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Whether anybody is looking at the page.
pub trait Visibility: Send + Sync + 'static {
    fn is_visible(&self) -> bool;
}

/// Always visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysVisible;

impl Visibility for AlwaysVisible {
    fn is_visible(&self) -> bool {
        true
    }
}

/// Visible while the page has been viewed within a sliding window.
#[derive(Debug, Clone)]
pub struct ViewActivity {
    last_view: Arc<Mutex<Option<Instant>>>,
    window: Duration,
}

impl ViewActivity {
    pub fn new(window: Duration) -> Self {
        Self {
            last_view: Arc::new(Mutex::new(None)),
            window,
        }
    }

    /// Marks the page as just viewed.
    pub fn record_view(&self) {
        *self.last_view.lock() = Some(Instant::now());
    }
}

impl Visibility for ViewActivity {
    fn is_visible(&self) -> bool {
        self.last_view
            .lock()
            .is_some_and(|at| at.elapsed() <= self.window)
    }
}

/// Spawns the refresh loop.
///
/// Every `interval` the dataset is reloaded if `visibility` reports the page
/// as visible; hidden ticks are skipped. There is no backoff. The task ends
/// when `shutdown` changes or its sender is dropped.
pub fn spawn_refresh<S, V>(
    browser: Arc<NodeBrowser<S>>,
    interval: Duration,
    visibility: V,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    S: DatasetSource,
    V: Visibility,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if visibility.is_visible() {
                        let outcome = browser.load().await;
                        tracing::debug!(?outcome, "Periodic refresh");
                    } else {
                        tracing::trace!("Page hidden, skipping refresh");
                    }
                }
                _ = shutdown.changed() => {
                    tracing::debug!("Refresh loop stopped");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use async_trait::async_trait;
    use nodeboard_types::Dataset;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DatasetSource for Counting {
        async fn fetch(&self) -> Result<Dataset, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Dataset::default())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[derive(Clone, Default)]
    struct Toggle(Arc<AtomicBool>);

    impl Visibility for Toggle {
        fn is_visible(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_only_while_visible() {
        let source = Arc::new(Counting::default());
        let browser = Arc::new(NodeBrowser::new(source.clone()));
        let visible = Toggle::default();
        visible.0.store(true, Ordering::SeqCst);
        let (tx, rx) = watch::channel(false);

        let handle = spawn_refresh(browser.clone(), DEFAULT_REFRESH_INTERVAL, visible.clone(), rx);

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(browser.phase().dataset().is_some());

        visible.0.store(false, Ordering::SeqCst);
        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL * 2).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        visible.0.store(true, Ordering::SeqCst);
        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_activity_window() {
        let activity = ViewActivity::new(Duration::from_secs(60));
        assert!(!activity.is_visible());

        activity.record_view();
        assert!(activity.is_visible());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!activity.is_visible());
        assert!(AlwaysVisible.is_visible());
    }
}
