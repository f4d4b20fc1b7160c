//! A unit loader that records what it was asked to do.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use lazyshot_background::{
    ActionHandler, BackgroundExports, MessageHandler, UnitLoadFailure, UnitLoader,
};
use lazyshot_core::UnitName;
use tokio::sync::Notify;

#[derive(Clone)]
enum Install {
    Actions(Arc<dyn ActionHandler>),
    Messages(Arc<dyn MessageHandler>),
}

/// Records every load in order and can fail, hold, or install handlers on
/// chosen units.
///
/// Clones share state.
#[derive(Clone, Default)]
pub struct RecordingUnitLoader {
    started: Arc<Mutex<Vec<String>>>,
    finished: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    installs: Arc<Mutex<Vec<(String, Install)>>>,
}

impl RecordingUnitLoader {
    /// Create a loader that loads every unit successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `unit` with an initialization error carrying `reason`.
    #[must_use]
    pub fn fail_on(self, unit: &str, reason: &str) -> Self {
        if let Ok(mut guard) = self.failures.lock() {
            guard.insert(unit.to_string(), reason.to_string());
        }
        self
    }

    /// Install `handler` as the action handler when `unit` loads.
    #[must_use]
    pub fn with_actions_on(self, unit: &str, handler: Arc<dyn ActionHandler>) -> Self {
        if let Ok(mut guard) = self.installs.lock() {
            guard.push((unit.to_string(), Install::Actions(handler)));
        }
        self
    }

    /// Install `handler` as the message handler when `unit` loads.
    #[must_use]
    pub fn with_messages_on(self, unit: &str, handler: Arc<dyn MessageHandler>) -> Self {
        if let Ok(mut guard) = self.installs.lock() {
            guard.push((unit.to_string(), Install::Messages(handler)));
        }
        self
    }

    /// Make the load of `unit` wait until the returned gate is notified.
    pub fn hold(&self, unit: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        if let Ok(mut guard) = self.gates.lock() {
            guard.insert(unit.to_string(), Arc::clone(&gate));
        }
        gate
    }

    /// This loader as a shareable trait object.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn UnitLoader> {
        Arc::new(self.clone())
    }

    /// Units whose load began, in order.
    #[must_use]
    pub fn started(&self) -> Vec<String> {
        self.started.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Units whose load finished successfully, in order.
    #[must_use]
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// How many loads began.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.started.lock().map(|g| g.len()).unwrap_or_default()
    }
}

impl fmt::Debug for RecordingUnitLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingUnitLoader")
            .field("started", &self.started())
            .field("finished", &self.finished())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UnitLoader for RecordingUnitLoader {
    async fn load(
        &self,
        unit: &UnitName,
        exports: &Arc<BackgroundExports>,
    ) -> Result<(), UnitLoadFailure> {
        let name = unit.as_str();
        if let Ok(mut guard) = self.started.lock() {
            guard.push(name.to_string());
        }

        let gate = self.gates.lock().ok().and_then(|g| g.get(name).cloned());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let failure = self.failures.lock().ok().and_then(|g| g.get(name).cloned());
        if let Some(reason) = failure {
            return Err(UnitLoadFailure::init(reason));
        }

        let installs: Vec<Install> = self
            .installs
            .lock()
            .map(|g| {
                g.iter()
                    .filter(|(target, _)| target == name)
                    .map(|(_, install)| install.clone())
                    .collect()
            })
            .unwrap_or_default();
        for install in installs {
            match install {
                Install::Actions(handler) => {
                    exports.install_actions(handler);
                },
                Install::Messages(handler) => {
                    exports.install_messages(handler);
                },
            }
        }

        if let Ok(mut guard) = self.finished.lock() {
            guard.push(name.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_fails() {
        let loader = RecordingUnitLoader::new().fail_on("B", "X");
        let exports = Arc::new(BackgroundExports::new());

        assert!(loader.load(&UnitName::from_static("A"), &exports).await.is_ok());
        let err = loader
            .load(&UnitName::from_static("B"), &exports)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "X");
        assert_eq!(loader.started(), vec!["A", "B"]);
        assert_eq!(loader.finished(), vec!["A"]);
    }
}
