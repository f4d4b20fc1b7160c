//! Narrow interfaces onto the host extension platform.
//!
//! The router and sequencer only see these traits, so they can be driven
//! with synthetic events in tests. A real host adapter implements them over
//! the platform's menu, i18n, runtime messaging, port, tab, and idle APIs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lazyshot_core::{ContextMenuItem, Tab, TabId};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{HostError, MessagingError};

/// Registers context-menu items.
pub trait ContextMenuRegistry: Send + Sync {
    /// Create a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the registration.
    fn create(&self, item: ContextMenuItem) -> Result<(), HostError>;
}

/// Looks up localized strings by message key.
pub trait Localizer: Send + Sync {
    /// The localized string for `key`, if one exists.
    fn message(&self, key: &str) -> Option<String>;
}

/// Outbound cross-context request/response messaging.
#[async_trait]
pub trait RuntimeMessenger: Send + Sync {
    /// Send `request` and wait for the response.
    ///
    /// `Ok(None)` means the receiver answered with nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::NoReceiver`] when no context is listening.
    async fn send_message(&self, request: Value) -> Result<Option<Value>, MessagingError>;
}

/// The sending half of a named port.
pub trait PortSender: Send + Sync {
    /// Port name.
    fn name(&self) -> &str;

    /// Post a message to the peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is disconnected.
    fn post_message(&self, message: Value) -> Result<(), HostError>;
}

/// Both halves of a freshly opened port.
pub struct PortEndpoints {
    /// Outbound half, shared with downstream logic.
    pub sender: Arc<dyn PortSender>,
    /// Inbound messages from the peer. Closes when the peer disconnects.
    pub inbound: mpsc::UnboundedReceiver<Value>,
}

/// Opens named ports to the privileged peer context.
pub trait PortConnector: Send + Sync {
    /// Open the port called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot open the port.
    fn connect(&self, name: &str) -> Result<PortEndpoints, HostError>;
}

/// Resolves tab ids to tabs.
#[async_trait]
pub trait TabLookup: Send + Sync {
    /// Fetch the current state of a tab.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NoSuchTab`] if the tab no longer exists.
    async fn get(&self, id: TabId) -> Result<Tab, HostError>;
}

/// What ended an idle wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTrigger {
    /// The host reported idleness.
    Idle,
    /// The bounded wait elapsed first.
    TimedOut,
}

/// Schedules work for when the host is idle.
#[async_trait]
pub trait IdleScheduler: Send + Sync {
    /// Resolve once the host is idle, or after `max_wait` at the latest.
    async fn wait_for_idle(&self, max_wait: Duration) -> IdleTrigger;
}

/// The full set of host collaborators used at startup.
#[derive(Clone)]
pub struct HostServices {
    /// Context-menu registration.
    pub menus: Arc<dyn ContextMenuRegistry>,
    /// Localized strings.
    pub i18n: Arc<dyn Localizer>,
    /// Outbound runtime messaging.
    pub messenger: Arc<dyn RuntimeMessenger>,
    /// Named port creation.
    pub ports: Arc<dyn PortConnector>,
    /// Tab lookup.
    pub tabs: Arc<dyn TabLookup>,
    /// Idle scheduling.
    pub idle: Arc<dyn IdleScheduler>,
}

/// Localize `key`, falling back to the key itself.
pub(crate) fn localize(i18n: &dyn Localizer, key: &str) -> String {
    i18n.message(key).unwrap_or_else(|| {
        tracing::warn!(key, "missing localized string, using key");
        key.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Table(HashMap<&'static str, &'static str>);

    impl Localizer for Table {
        fn message(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|s| (*s).to_string())
        }
    }

    #[test]
    fn localize_prefers_translation() {
        let table = Table(HashMap::from([("contextMenuLabel", "Take a Screenshot")]));
        assert_eq!(localize(&table, "contextMenuLabel"), "Take a Screenshot");
    }

    #[test]
    fn localize_falls_back_to_key() {
        let table = Table(HashMap::new());
        assert_eq!(localize(&table, "contextMenuLabel"), "contextMenuLabel");
    }
}
