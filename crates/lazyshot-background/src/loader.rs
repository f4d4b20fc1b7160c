//! Unit loading.
//!
//! A [`UnitLoader`] turns a unit name into a loaded piece of logic. The
//! bootstrap never inspects what a unit does; it only cares whether the
//! load succeeded.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use lazyshot_core::UnitName;
use tracing::trace;

use crate::error::UnitLoadFailure;
use crate::modules::BackgroundExports;

/// Loads a single named unit.
#[async_trait]
pub trait UnitLoader: Send + Sync {
    /// Load `unit`. Earlier units in the list have already loaded.
    ///
    /// # Errors
    ///
    /// Returns the reason the unit could not be loaded.
    async fn load(
        &self,
        unit: &UnitName,
        exports: &Arc<BackgroundExports>,
    ) -> Result<(), UnitLoadFailure>;
}

/// The body of one unit.
#[async_trait]
pub trait UnitInitializer: Send + Sync {
    /// Run the unit's initialization.
    ///
    /// # Errors
    ///
    /// Returns the reason initialization failed.
    async fn initialize(&self, exports: Arc<BackgroundExports>) -> Result<(), UnitLoadFailure>;
}

#[async_trait]
impl<F, Fut> UnitInitializer for F
where
    F: Fn(Arc<BackgroundExports>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), UnitLoadFailure>> + Send + 'static,
{
    async fn initialize(&self, exports: Arc<BackgroundExports>) -> Result<(), UnitLoadFailure> {
        (self)(exports).await
    }
}

/// A unit with nothing to initialize.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyUnit;

#[async_trait]
impl UnitInitializer for EmptyUnit {
    async fn initialize(&self, _exports: Arc<BackgroundExports>) -> Result<(), UnitLoadFailure> {
        Ok(())
    }
}

/// A loader backed by a fixed table of compiled-in units.
#[derive(Default)]
pub struct StaticUnitLoader {
    units: HashMap<UnitName, Arc<dyn UnitInitializer>>,
}

impl StaticUnitLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the body of `name`, replacing any earlier registration.
    #[must_use]
    pub fn with_unit(mut self, name: UnitName, unit: impl UnitInitializer + 'static) -> Self {
        self.register(name, Arc::new(unit));
        self
    }

    /// Register the body of `name`, replacing any earlier registration.
    pub fn register(&mut self, name: UnitName, unit: Arc<dyn UnitInitializer>) {
        self.units.insert(name, unit);
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &UnitName) -> bool {
        self.units.contains_key(name)
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no units are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[async_trait]
impl UnitLoader for StaticUnitLoader {
    async fn load(
        &self,
        unit: &UnitName,
        exports: &Arc<BackgroundExports>,
    ) -> Result<(), UnitLoadFailure> {
        let body = self.units.get(unit).ok_or(UnitLoadFailure::NotFound)?;
        trace!(unit = %unit, "initializing unit");
        body.initialize(Arc::clone(exports)).await
    }
}
