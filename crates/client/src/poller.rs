//! Resource polling
//!
//! Timer-driven refresh for one resource. A fetch never starts while the
//! previous fetch for the same watcher is outstanding: ticks that elapse
//! mid-fetch are coalesced into at most one pending tick, never queued.
//! The task stops on `stop()` or when the handle is dropped.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Handle to a running poll task
pub struct ResourceWatcher {
    name: String,
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ResourceWatcher {
    /// Spawn a poll loop that invokes `fetch` every `interval`.
    ///
    /// Fetch errors are logged and do not terminate the loop.
    pub fn spawn<F, Fut>(name: impl Into<String>, interval: Duration, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = clouddeck_common::Result<()>> + Send,
    {
        let name = name.into();
        let (cancel, mut cancelled) = watch::channel(false);
        let task_name = name.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancelled.changed() => {
                        debug!("Watcher {} cancelled", task_name);
                        break;
                    }
                    _ = ticker.tick() => {
                        tokio::select! {
                            // Cancel mid-fetch discards the in-flight result.
                            _ = cancelled.changed() => {
                                debug!("Watcher {} cancelled mid-fetch", task_name);
                                break;
                            }
                            result = fetch() => {
                                if let Err(e) = result {
                                    warn!("Watcher {} fetch failed: {}", task_name, e);
                                }
                            }
                        }
                    }
                }
            }
        });

        Self {
            name,
            cancel,
            task: Some(task),
        }
    }

    /// Watcher name, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the poll loop and wait for the task to wind down
    pub async fn stop(mut self) {
        let _ = self.cancel.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ResourceWatcher {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fetches_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        let watcher = {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            let runs = runs.clone();
            ResourceWatcher::spawn("servers", Duration::from_millis(100), move || {
                let in_flight = in_flight.clone();
                let max_seen = max_seen.clone();
                let runs = runs.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    // A fetch slower than the tick interval must still not
                    // overlap with the next one.
                    tokio::time::sleep(Duration::from_millis(350)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(1200)).await;
        watcher.stop().await;

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(runs.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_polling() {
        let runs = Arc::new(AtomicUsize::new(0));

        let watcher = {
            let runs = runs.clone();
            ResourceWatcher::spawn("logs", Duration::from_millis(50), move || {
                let runs = runs.clone();
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(220)).await;
        watcher.stop().await;
        let after_stop = runs.load(Ordering::SeqCst);
        assert!(after_stop >= 3);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_errors_do_not_kill_loop() {
        let runs = Arc::new(AtomicUsize::new(0));

        let watcher = {
            let runs = runs.clone();
            ResourceWatcher::spawn("flaky", Duration::from_millis(50), move || {
                let runs = runs.clone();
                async move {
                    let n = runs.fetch_add(1, Ordering::SeqCst);
                    if n % 2 == 0 {
                        Err(clouddeck_common::Error::Network("boom".into()))
                    } else {
                        Ok(())
                    }
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        watcher.stop().await;
        assert!(runs.load(Ordering::SeqCst) >= 4);
    }
}
