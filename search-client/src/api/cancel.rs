//! Cooperative cancellation primitives.
//!
//! A request is issued together with a [`CancelToken`]; whoever holds the
//! matching [`CancelHandle`] can abort it. The transport races every await
//! against the token, so a cancelled request always resolves (with
//! `ApiError::Cancelled`) instead of settling outside the caller's control.

use tokio::sync::watch;

/// Create a linked handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The cancelling side of a pair. Held by the coordinator that issued the
/// request; dropping it without calling [`cancel`](Self::cancel) leaves the
/// request running to completion.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// The observing side of a pair, passed into the transport.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is signalled. If the handle is dropped
    /// without cancelling, this never resolves.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn starts_uncancelled() {
        let (_handle, token) = cancel_pair();
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_is_observed() {
        let (handle, mut token) = cancel_pair();
        handle.cancel();
        assert!(token.is_cancelled());
        token.cancelled().await; // resolves immediately
    }

    #[tokio::test]
    async fn clones_share_the_signal() {
        let (handle, token) = cancel_pair();
        let clone = token.clone();
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_unblocks_waiter() {
        let (handle, mut token) = cancel_pair();

        let waiter = tokio::spawn(async move {
            token.cancelled().await;
        });

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should resolve after cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_handle_never_resolves() {
        let (handle, mut token) = cancel_pair();
        drop(handle);

        assert!(!token.is_cancelled());
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
        assert!(outcome.is_err(), "cancelled() must pend forever");
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let (handle, token) = cancel_pair();
        handle.cancel();
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
