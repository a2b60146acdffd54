//! Latest-request-wins tracking for background operations.
//!
//! Each operation kind (location, weather, search) owns one
//! `SingleFlight`. Launching a new request aborts the previous task and
//! issues a fresh token; a completion carrying an older token is stale
//! and must be dropped.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Identifies one launched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlightToken(u64);

#[derive(Debug)]
pub struct SingleFlight {
    name: &'static str,
    latest: u64,
    handle: Option<JoinHandle<()>>,
}

impl SingleFlight {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            latest: 0,
            handle: None,
        }
    }

    /// Spawn `make(token)` as the new latest request.
    pub fn launch<F, Fut>(&mut self, make: F) -> FlightToken
    where
        F: FnOnce(FlightToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.supersede();
        self.handle = Some(tokio::spawn(make(token)));
        token
    }

    /// Abort whatever is in flight without starting anything new.
    pub fn invalidate(&mut self) {
        self.supersede();
    }

    fn supersede(&mut self) -> FlightToken {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!(flight = self.name, superseded = self.latest, "Aborting stale request");
                handle.abort();
            }
        }
        self.latest += 1;
        FlightToken(self.latest)
    }

    pub fn is_current(&self, token: FlightToken) -> bool {
        token.0 == self.latest
    }

    /// Accept a completion. Returns false (and leaves state untouched) for
    /// a superseded token.
    pub fn complete(&mut self, token: FlightToken) -> bool {
        if !self.is_current(token) {
            debug!(flight = self.name, token = token.0, latest = self.latest, "Discarding stale result");
            return false;
        }
        self.handle = None;
        true
    }
}

impl Drop for SingleFlight {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_newer_launch_supersedes() {
        let mut flight = SingleFlight::new("weather");
        let first = flight.launch(|_| async {});
        let second = flight.launch(|_| async {});

        assert!(!flight.is_current(first));
        assert!(flight.is_current(second));
        assert!(!flight.complete(first));
        assert!(flight.complete(second));
    }

    #[tokio::test]
    async fn test_launch_aborts_previous_task() {
        let mut flight = SingleFlight::new("search");
        let (tx, rx) = oneshot::channel::<()>();
        flight.launch(move |_| async move {
            std::future::pending::<()>().await;
            drop(tx);
        });
        flight.launch(|_| async {});

        // The aborted task drops its sender without sending.
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn test_invalidate_makes_all_tokens_stale() {
        let mut flight = SingleFlight::new("location");
        let token = flight.launch(|_| async {});
        flight.invalidate();
        assert!(!flight.complete(token));
        assert!(flight.handle.is_none());
    }

    #[tokio::test]
    async fn test_token_passed_to_task() {
        let mut flight = SingleFlight::new("weather");
        let (tx, rx) = oneshot::channel();
        let launched = flight.launch(move |token| async move {
            let _ = tx.send(token);
        });
        assert_eq!(rx.await.unwrap(), launched);
    }
}
