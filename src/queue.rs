//! The shared work queue between the generator and the processors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::model::TransactionRequest;

/// Unbounded FIFO of transaction requests with a timed receive.
///
/// Receivers queue up on a fair lock around the channel, so the longest
/// waiting processor gets the next request and each request reaches exactly
/// one processor.
#[derive(Debug)]
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<TransactionRequest>,
    rx: Mutex<mpsc::UnboundedReceiver<TransactionRequest>>,
    pending: AtomicUsize,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            pending: AtomicUsize::new(0),
        }
    }

    /// Enqueue a request. Never blocks.
    pub fn submit(&self, request: TransactionRequest) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        // The receiver lives as long as `self`, so the channel cannot be closed here.
        let _ = self.tx.send(request);
    }

    /// Wait up to `timeout` for the next request. `None` means nothing arrived in time.
    pub async fn receive(&self, timeout: Duration) -> Option<TransactionRequest> {
        let next = async {
            let mut rx = self.rx.lock().await;
            rx.recv().await
        };
        let request = tokio::time::timeout(timeout, next).await.ok().flatten()?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(request)
    }

    /// Requests submitted but not yet received.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}
