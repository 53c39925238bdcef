//! Small async helpers shared across the workspace.
//!
//! The one piece of machinery every cancellable task needs is a way to race
//! a future against a [`tokio_util::sync::CancellationToken`] without
//! writing `tokio::select!` at every call site. [`CancelExt::or_cancel`]
//! provides that.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// The outcome of racing a future against a [`CancellationToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelErr {
    /// The token was cancelled before the future completed.
    Cancelled,
}

impl std::fmt::Display for CancelErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation cancelled")
    }
}

impl std::error::Error for CancelErr {}

/// Extension trait adding cancellation racing to any future.
#[async_trait::async_trait]
pub trait CancelExt: Future + Sized {
    /// Runs this future to completion, or returns `Err(CancelErr::Cancelled)`
    /// as soon as `token` is cancelled, whichever happens first.
    ///
    /// Used throughout the Streaming Engine (provider reads, tool
    /// executions) so a session's `CancellationToken` can interrupt any
    /// in-flight awaited step promptly.
    async fn or_cancel(self, token: &CancellationToken) -> Result<Self::Output, CancelErr>
    where
        Self: Send,
        Self::Output: Send;
}

#[async_trait::async_trait]
impl<F> CancelExt for F
where
    F: Future + Send,
    F::Output: Send,
{
    async fn or_cancel(self, token: &CancellationToken) -> Result<Self::Output, CancelErr> {
        tokio::select! {
            biased;
            () = token.cancelled() => Err(CancelErr::Cancelled),
            value = self => Ok(value),
        }
    }
}

/// Runs `action` once every `interval`, coalescing calls that arrive while
/// an invocation is already scheduled — used by the 50 ms store-write
/// coalescing window in the Streaming Engine (spec §4.8 step 5).
pub struct CoalescingTimer {
    interval: std::time::Duration,
    pending: tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl CoalescingTimer {
    pub fn new(interval: std::time::Duration) -> Self {
        Self {
            interval,
            pending: tokio::sync::Mutex::new(None),
        }
    }

    /// Schedules `action` to run after the coalescing interval elapses,
    /// cancelling any previously scheduled-but-not-yet-run action so that
    /// only the latest state is flushed.
    pub async fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut guard = self.pending.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        let interval = self.interval;
        *guard = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            action.await;
        }));
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
