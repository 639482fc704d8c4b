//! Ownership of out-of-band work
//!
//! Timers and audio cleanup run as tokio tasks tracked by one
//! [`Background`]. At shutdown the token is cancelled and the tracker is
//! awaited, so no task outlives the session.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Tracks background tasks and cancels them together
#[derive(Debug, Clone, Default)]
pub struct Background {
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl Background {
    /// Create an empty set of background tasks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task that is dropped when shutdown begins
    pub fn spawn<F>(&self, name: &'static str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        tracing::trace!(task = name, "spawning background task");
        self.tracker.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(task = name, "background task cancelled");
                }
                () = task => {}
            }
        })
    }

    /// Spawn a task that observes the shutdown token itself
    ///
    /// Use this when the task has to run its own teardown on cancellation.
    pub fn spawn_with_token<F, Fut>(&self, name: &'static str, task: F) -> JoinHandle<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tracing::trace!(task = name, "spawning background task");
        self.tracker.spawn(task(self.shutdown.clone()))
    }

    /// Number of tasks still running
    #[must_use]
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Whether shutdown has begun
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Wait up to `timeout` for running tasks to finish on their own
    ///
    /// Returns true if every task finished.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let finished = tokio::time::timeout(timeout, self.tracker.wait()).await.is_ok();
        self.tracker.reopen();
        finished
    }

    /// Let running tasks finish for up to `grace`, then cancel the rest
    ///
    /// Returns true if every task finished before it had to be cancelled.
    pub async fn finish(&self, grace: Duration) -> bool {
        if self.drain(grace).await {
            self.shutdown(Duration::ZERO).await;
            return true;
        }
        tracing::debug!(remaining = self.tracker.len(), "grace period over, cancelling");
        self.shutdown(Duration::from_secs(1)).await;
        false
    }

    /// Cancel every task and wait up to `grace` for them to stop
    ///
    /// Returns true if every task stopped in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.shutdown.cancel();
        self.tracker.close();

        let stopped = tokio::time::timeout(grace, self.tracker.wait()).await.is_ok();
        if stopped {
            tracing::debug!("background tasks stopped");
        } else {
            tracing::warn!(remaining = self.tracker.len(), "background tasks still running at shutdown");
        }
        stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_tasks() {
        let background = Background::new();
        let (tx, mut rx) = tokio::sync::oneshot::channel::<()>();

        background.spawn("sleeper", async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            let _ = tx.send(());
        });
        assert_eq!(background.active(), 1);

        assert!(background.shutdown(Duration::from_secs(1)).await);
        assert!(background.is_shutting_down());
        assert_eq!(background.active(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_tasks_run_teardown() {
        let background = Background::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        background.spawn_with_token("cleanup", |token| async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(Duration::from_secs(60)) => {}
            }
            let _ = tx.send("teardown");
        });

        assert!(background.shutdown(Duration::from_secs(1)).await);
        assert_eq!(rx.await.unwrap(), "teardown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_lets_tasks_complete_then_cancels() {
        let background = Background::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        background.spawn("short", async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = tx.send(());
        });
        assert!(background.finish(Duration::from_secs(10)).await);
        assert!(rx.await.is_ok());
        assert!(background.is_shutting_down());

        let background = Background::new();
        background.spawn("long", std::future::pending());
        let started = tokio::time::Instant::now();
        assert!(!background.finish(Duration::from_secs(10)).await);
        assert_eq!(background.active(), 0);
        assert!(started.elapsed() < Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_waits_without_cancelling() {
        let background = Background::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        background.spawn("short", async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            let _ = tx.send(());
        });

        assert!(background.drain(Duration::from_secs(5)).await);
        assert!(rx.await.is_ok());
        assert!(!background.is_shutting_down());
    }
}
