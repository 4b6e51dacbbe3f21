//! Deferred continuations for simulated "typing" and "analyzing" delays.
//!
//! A [`ScheduledTask`] sleeps for a fixed delay and then runs its
//! continuation exactly once. It is never retried and has no timeout of its
//! own. The only cancellation point is teardown: calling
//! [`ScheduledTask::cancel`] or dropping the handle before it completes.
//! Swapping the sleep for a real asynchronous call only changes what is
//! passed to [`schedule_async`]; call sites keep awaiting [`ScheduledTask::wait`].

use crate::error::{IntakeError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct ScheduledTask<T> {
    handle: Option<JoinHandle<T>>,
}

/// Run `f` after `delay` on the current tokio runtime.
///
/// Panics if called outside a runtime, like `tokio::spawn`.
pub fn schedule<T, F>(delay: Duration, f: F) -> ScheduledTask<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    schedule_async(delay, async move { f() })
}

/// Await `fut` after `delay` on the current tokio runtime.
pub fn schedule_async<T, Fut>(delay: Duration, fut: Fut) -> ScheduledTask<T>
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        fut.await
    });
    ScheduledTask {
        handle: Some(handle),
    }
}

impl<T> ScheduledTask<T> {
    /// Wait for the continuation. A panicked or cancelled continuation is
    /// reported as [`IntakeError::TaskFailed`].
    pub async fn wait(mut self) -> Result<T> {
        let Some(handle) = self.handle.take() else {
            return Err(IntakeError::TaskFailed("task already consumed".to_string()));
        };
        handle.await.map_err(|e| {
            if e.is_cancelled() {
                IntakeError::TaskFailed("cancelled".to_string())
            } else {
                IntakeError::TaskFailed("continuation panicked".to_string())
            }
        })
    }

    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_finished()).unwrap_or(true)
    }
}

impl<T> Drop for ScheduledTask<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
