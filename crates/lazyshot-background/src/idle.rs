//! A tokio-backed idle scheduler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::host::{IdleScheduler, IdleTrigger};

/// Idle scheduler driven by an explicit "host is idle" signal.
///
/// A host adapter calls [`TokioIdleScheduler::signal_idle`] from its idle
/// callback. A signal sent before anyone waits is kept for the next waiter.
#[derive(Debug, Clone, Default)]
pub struct TokioIdleScheduler {
    notify: Arc<Notify>,
}

impl TokioIdleScheduler {
    /// Create a scheduler that has not seen idleness yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that the host is idle.
    pub fn signal_idle(&self) {
        self.notify.notify_one();
    }
}

#[async_trait]
impl IdleScheduler for TokioIdleScheduler {
    async fn wait_for_idle(&self, max_wait: Duration) -> IdleTrigger {
        match tokio::time::timeout(max_wait, self.notify.notified()).await {
            Ok(()) => IdleTrigger::Idle,
            Err(_) => IdleTrigger::TimedOut,
        }
    }
}
