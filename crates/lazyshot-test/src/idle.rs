//! Deterministic idle scheduling.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lazyshot_background::{IdleScheduler, IdleTrigger};
use tokio::sync::watch;

/// Idle scheduler that resolves only when the test says so.
#[derive(Debug, Clone)]
pub struct ManualIdleScheduler {
    trigger: Arc<watch::Sender<Option<IdleTrigger>>>,
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl ManualIdleScheduler {
    /// Create a scheduler with no trigger fired.
    #[must_use]
    pub fn new() -> Self {
        let (trigger, _) = watch::channel(None);
        Self {
            trigger: Arc::new(trigger),
            waits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report that the host is idle.
    pub fn fire_idle(&self) {
        self.trigger.send_replace(Some(IdleTrigger::Idle));
    }

    /// Pretend the bounded wait elapsed.
    pub fn fire_timeout(&self) {
        self.trigger.send_replace(Some(IdleTrigger::TimedOut));
    }

    /// The `max_wait` of every wait requested so far.
    #[must_use]
    pub fn requested_waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Default for ManualIdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdleScheduler for ManualIdleScheduler {
    async fn wait_for_idle(&self, max_wait: Duration) -> IdleTrigger {
        if let Ok(mut guard) = self.waits.lock() {
            guard.push(max_wait);
        }
        let mut rx = self.trigger.subscribe();
        rx.wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|trigger| *trigger)
            .unwrap_or(IdleTrigger::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_on_fire() {
        let idle = ManualIdleScheduler::new();
        let waiter = {
            let idle = idle.clone();
            tokio::spawn(async move { idle.wait_for_idle(Duration::from_secs(2)).await })
        };
        tokio::task::yield_now().await;
        idle.fire_timeout();
        assert_eq!(waiter.await.unwrap(), IdleTrigger::TimedOut);
        assert_eq!(idle.requested_waits(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn fired_before_wait() {
        let idle = ManualIdleScheduler::new();
        idle.fire_idle();
        assert_eq!(
            idle.wait_for_idle(Duration::from_secs(2)).await,
            IdleTrigger::Idle
        );
    }
}
