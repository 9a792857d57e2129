//! Graceful shutdown trigger shared between the server and its owner.
//!
//! Tests and embedders hold a [`Shutdown`] and hand
//! [`Shutdown::signalled`] to `Application::serve`; the binary uses OS
//! signals instead.

use std::future::Future;

use tokio::sync::broadcast;

/// Cloneable handle that fans one stop request out to every waiter.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Raw receiver, for tasks that `select!` on shutdown themselves.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// A future that resolves once [`trigger`](Self::trigger) is called
    /// or every handle is dropped.
    ///
    /// Subscribes immediately, so a trigger issued before the future is
    /// first polled is not missed.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Ask every waiter to stop. A trigger with no waiters is a no-op.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no waiters");
        }
    }

    /// Number of outstanding waiters.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
