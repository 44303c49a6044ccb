use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Shared, one-way stop flag.
///
/// Clones observe the same flag. Waiters blocked in [`CancellationToken::wait_timeout`] wake as
/// soon as the token is cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the flag and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.flag();
        *cancelled = true;
        self.inner.1.notify_all();
    }

    /// `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    /// Sleep for up to `timeout`, returning early on cancellation.
    ///
    /// Returns `true` when the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.flag();
        let (guard, _) = self
            .inner
            .1
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/cancel.rs"]
mod tests;
