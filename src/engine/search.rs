//! Free-text search helpers: the debounce slot and query guards.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::types::SearchCandidate;

/// One shared quiet-period timer. Re-arming aborts the pending one, so
/// only the last keystroke in a burst fires.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Run `fire` once `delay` has passed without another `arm`/`cancel`.
    pub fn arm<Fut>(&mut self, fire: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Trimmed query, or `None` when it is too short to send.
pub fn searchable(input: &str, min_chars: usize) -> Option<&str> {
    let query = input.trim();
    (query.chars().count() >= min_chars).then_some(query)
}

/// Submit reuses the cached set when any full display name contains the
/// query; the top entry is then applied.
pub fn cached_answer<'a>(cache: &'a [SearchCandidate], query: &str) -> Option<&'a SearchCandidate> {
    if query.is_empty() || !cache.iter().any(|c| c.display_name.contains(query)) {
        return None;
    }
    cache.first()
}
