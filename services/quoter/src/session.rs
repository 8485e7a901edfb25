//! Request supersession for one caller
//!
//! A caller that re-quotes on every keystroke only cares about its latest
//! request. Starting a request through a [`QuoteSession`] supersedes the
//! one before it: the older future is dropped at its next await point, and
//! a result that completes after being superseded is discarded.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct QuoteSession {
    generation: Arc<AtomicU64>,
    notify: Arc<Notify>,
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `request` as the session's latest request
    ///
    /// Returns `None` when a newer request started before this one finished.
    pub async fn run<F, T>(&self, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.notify.notify_waiters();

        tokio::select! {
            result = request => {
                if self.is_current(ticket) {
                    Some(result)
                } else {
                    debug!("Dropping result of superseded request {}", ticket);
                    None
                }
            }
            _ = self.superseded(ticket) => {
                debug!("Request {} superseded while in flight", ticket);
                None
            }
        }
    }

    /// Abandon whatever request is in flight
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    async fn superseded(&self, ticket: u64) {
        loop {
            // Register before checking so a concurrent notify is not missed
            let notified = self.notify.notified();
            if !self.is_current(ticket) {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_request_completes() {
        let session = QuoteSession::new();
        assert_eq!(session.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let session = QuoteSession::new();

        let first = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .run(async {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        "stale"
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = session.run(async { "fresh" }).await;

        assert_eq!(second, Some("fresh"));
        assert_eq!(first.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancel_abandons_in_flight_request() {
        let session = QuoteSession::new();

        let pending = {
            let session = session.clone();
            tokio::spawn(async move {
                session
                    .run(tokio::time::sleep(Duration::from_secs(30)))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        session.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, None);
    }
}
