//! Cooperative cancellation for blocking extraction work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Shared stop flag for extractions running on the blocking pool.
///
/// Dropping an `extract` future does not stop its worker thread. Callers
/// that need the scratch tree quiet (before removing it) call
/// [`ExtractGate::cancel_and_wait`], which raises the flag and then waits
/// until no unpack loop holds the gate.
#[derive(Debug, Clone, Default)]
pub struct ExtractGate {
    cancelled: Arc<AtomicBool>,
    busy: Arc<Mutex<()>>,
}

impl ExtractGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Stops further unpacking and waits for in-flight work to return.
    pub async fn cancel_and_wait(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _idle = self.busy.lock().await;
    }

    /// Marks one extraction as running until the guard is dropped.
    pub(crate) async fn enter(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.busy).lock_owned().await
    }

    pub(crate) fn flag(&self) -> &AtomicBool {
        &self.cancelled
    }
}
