//! Deferred, ordered, run-once loading of the background units.
//!
//! [`BootstrapSequencer::ensure_ready`] is the single gate every inbound
//! event passes through. The first call starts loading the configured units
//! one after another; every call, before or after completion, receives a
//! clone of the same [`ReadyFuture`].

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lazyshot_core::UnitName;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{LoadError, UnitLoadFailure, panic_message};
use crate::loader::UnitLoader;
use crate::modules::BackgroundExports;

/// Outcome of the bootstrap, shared by every waiter.
pub type ReadyResult = Result<(), Arc<LoadError>>;

/// Shared completion handle returned by [`BootstrapSequencer::ensure_ready`].
pub type ReadyFuture = Shared<BoxFuture<'static, ReadyResult>>;

/// Where the bootstrap is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    /// Nobody has asked for the units yet.
    NotStarted,
    /// Units are loading.
    InProgress,
    /// Loading finished, successfully or not. Never regresses.
    Complete,
}

struct Inner {
    units: Vec<UnitName>,
    loader: Arc<dyn UnitLoader>,
    exports: Arc<BackgroundExports>,
    ready: Mutex<Option<ReadyFuture>>,
    attached: Mutex<Vec<UnitName>>,
}

/// Loads the background units exactly once, in order, on first demand.
#[derive(Clone)]
pub struct BootstrapSequencer {
    inner: Arc<Inner>,
}

impl BootstrapSequencer {
    /// Create a sequencer over an ordered unit list.
    #[must_use]
    pub fn new(
        units: Vec<UnitName>,
        loader: Arc<dyn UnitLoader>,
        exports: Arc<BackgroundExports>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                units,
                loader,
                exports,
                ready: Mutex::new(None),
                attached: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Start loading if nobody has yet, and return the shared readiness
    /// handle.
    ///
    /// The check-and-set happens under a synchronous lock, so concurrent
    /// callers always attach to the same future. When called inside a tokio
    /// runtime the load is spawned and keeps running even if every waiter
    /// is dropped.
    pub fn ensure_ready(&self) -> ReadyFuture {
        let mut slot = self
            .inner
            .ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(ready) = slot.as_ref() {
            return ready.clone();
        }

        debug!(units = self.inner.units.len(), "starting background bootstrap");
        let ready = load_all(Arc::clone(&self.inner)).boxed().shared();
        *slot = Some(ready.clone());
        drop(slot);

        match Handle::try_current() {
            Ok(handle) => {
                let driver = ready.clone();
                handle.spawn(async move {
                    let _ = driver.await;
                });
            },
            Err(_) => debug!("no runtime available, bootstrap is driven by its waiters"),
        }

        ready
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReadinessState {
        let slot = self
            .inner
            .ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            None => ReadinessState::NotStarted,
            Some(ready) if ready.peek().is_some() => ReadinessState::Complete,
            Some(_) => ReadinessState::InProgress,
        }
    }

    /// The bootstrap result, once complete.
    #[must_use]
    pub fn outcome(&self) -> Option<ReadyResult> {
        self.inner
            .ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|ready| ready.peek().cloned())
    }

    /// Units whose load has begun, in the order they were attached.
    #[must_use]
    pub fn attached_units(&self) -> Vec<UnitName> {
        self.inner
            .attached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The configured unit list.
    #[must_use]
    pub fn units(&self) -> &[UnitName] {
        &self.inner.units
    }

    /// Exports handed to each unit while it loads.
    #[must_use]
    pub fn exports(&self) -> &Arc<BackgroundExports> {
        &self.inner.exports
    }
}

impl fmt::Debug for BootstrapSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSequencer")
            .field("units", &self.inner.units)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

async fn load_all(inner: Arc<Inner>) -> ReadyResult {
    for unit in &inner.units {
        inner
            .attached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(unit.clone());

        debug!(unit = %unit, "loading unit");
        let loaded = AssertUnwindSafe(inner.loader.load(unit, &inner.exports))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(UnitLoadFailure::init(format!(
                    "panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        if let Err(source) = loaded {
            let err = Arc::new(LoadError {
                unit: unit.clone(),
                source,
            });
            warn!(unit = %unit, error = %err, "background bootstrap failed");
            return Err(err);
        }
    }

    info!(units = inner.units.len(), "background units loaded");
    Ok(())
}
