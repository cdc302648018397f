//! Trailing-edge debounce timer backed by a single tokio task.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Holds at most one pending timer.
///
/// Scheduling always aborts the previous timer first, so only the last
/// action scheduled within any quiet window ever runs. Dropping the
/// debouncer aborts whatever is still pending.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`, cancelling any previously scheduled action.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Abort the pending timer. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    /// Whether a scheduled action has not yet completed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
