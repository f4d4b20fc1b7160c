//! Mock host platform.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lazyshot_background::{
    ContextMenuRegistry, HostError, HostServices, Localizer, MessagingError, PortConnector,
    PortEndpoints, PortSender, RuntimeMessenger, TabLookup,
};
use lazyshot_core::{ContextMenuItem, Tab, TabId};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::idle::ManualIdleScheduler;

/// Mock page-action port. Records everything posted to the peer.
#[derive(Debug, Clone)]
pub struct MockPort {
    name: String,
    posted: Arc<Mutex<Vec<Value>>>,
    connected: Arc<AtomicBool>,
}

impl MockPort {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            posted: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Messages posted so far.
    #[must_use]
    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl PortSender for MockPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn post_message(&self, message: Value) -> Result<(), HostError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(HostError::PortDisconnected(self.name.clone()));
        }
        if let Ok(mut guard) = self.posted.lock() {
            guard.push(message);
        }
        Ok(())
    }
}

/// Mock implementation of every host trait.
///
/// Clones share state, so a test keeps one handle while the background
/// holds the others through [`MockHost::services`].
#[derive(Debug, Clone)]
pub struct MockHost {
    /// Registered context-menu items.
    menus: Arc<Mutex<Vec<ContextMenuItem>>>,
    /// Error returned by menu registration, if any.
    menu_error: Arc<Mutex<Option<HostError>>>,
    /// Localized strings.
    translations: Arc<Mutex<HashMap<String, String>>>,
    /// Queued replies for outbound runtime messages.
    replies: Arc<Mutex<VecDeque<Result<Option<Value>, MessagingError>>>>,
    /// Captured outbound runtime messages.
    sent: Arc<Mutex<Vec<Value>>>,
    /// Ports opened so far, by name.
    ports: Arc<Mutex<Vec<MockPort>>>,
    /// Inbound half of the most recent port.
    port_inbound: Arc<Mutex<Option<mpsc::UnboundedSender<Value>>>>,
    /// Whether port creation should fail.
    refuse_ports: Arc<AtomicBool>,
    /// Known tabs.
    tabs: Arc<Mutex<HashMap<TabId, Tab>>>,
    /// Tab ids looked up so far.
    tab_lookups: Arc<Mutex<Vec<TabId>>>,
    /// Idle scheduler handed to the background.
    idle: ManualIdleScheduler,
}

impl MockHost {
    /// Create a mock host with no tabs, translations or peer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            menus: Arc::new(Mutex::new(Vec::new())),
            menu_error: Arc::new(Mutex::new(None)),
            translations: Arc::new(Mutex::new(HashMap::new())),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            ports: Arc::new(Mutex::new(Vec::new())),
            port_inbound: Arc::new(Mutex::new(None)),
            refuse_ports: Arc::new(AtomicBool::new(false)),
            tabs: Arc::new(Mutex::new(HashMap::new())),
            tab_lookups: Arc::new(Mutex::new(Vec::new())),
            idle: ManualIdleScheduler::new(),
        }
    }

    /// Add a localized string.
    #[must_use]
    pub fn with_translation(self, key: &str, value: &str) -> Self {
        if let Ok(mut guard) = self.translations.lock() {
            guard.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Add a tab that [`TabLookup::get`] can resolve.
    #[must_use]
    pub fn with_tab(self, tab: Tab) -> Self {
        if let Ok(mut guard) = self.tabs.lock() {
            guard.insert(tab.id, tab);
        }
        self
    }

    /// Queue the answer to the next outbound runtime message.
    ///
    /// With nothing queued, sends fail with [`MessagingError::NoReceiver`].
    #[must_use]
    pub fn with_peer_reply(self, reply: Result<Option<Value>, MessagingError>) -> Self {
        if let Ok(mut guard) = self.replies.lock() {
            guard.push_back(reply);
        }
        self
    }

    /// Make menu registration fail.
    #[must_use]
    pub fn with_menu_error(self, error: HostError) -> Self {
        if let Ok(mut guard) = self.menu_error.lock() {
            *guard = Some(error);
        }
        self
    }

    /// Make port creation fail.
    #[must_use]
    pub fn refusing_ports(self) -> Self {
        self.refuse_ports.store(true, Ordering::SeqCst);
        self
    }

    /// Host services backed by this mock.
    #[must_use]
    pub fn services(&self) -> HostServices {
        HostServices {
            menus: Arc::new(self.clone()),
            i18n: Arc::new(self.clone()),
            messenger: Arc::new(self.clone()),
            ports: Arc::new(self.clone()),
            tabs: Arc::new(self.clone()),
            idle: Arc::new(self.idle.clone()),
        }
    }

    /// The idle scheduler handed out by [`MockHost::services`].
    #[must_use]
    pub fn idle(&self) -> &ManualIdleScheduler {
        &self.idle
    }

    /// Registered context-menu items.
    #[must_use]
    pub fn menus(&self) -> Vec<ContextMenuItem> {
        self.menus.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Outbound runtime messages sent so far.
    #[must_use]
    pub fn sent_messages(&self) -> Vec<Value> {
        self.sent.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Ports opened so far.
    #[must_use]
    pub fn ports(&self) -> Vec<MockPort> {
        self.ports.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Messages posted on the most recently opened port.
    #[must_use]
    pub fn posted_port_messages(&self) -> Vec<Value> {
        self.ports().last().map(MockPort::posted).unwrap_or_default()
    }

    /// Deliver `message` from the peer on the open port.
    ///
    /// Returns `false` if no port is open.
    pub fn send_port_message(&self, message: Value) -> bool {
        self.port_inbound
            .lock()
            .ok()
            .and_then(|g| g.as_ref().map(|tx| tx.send(message).is_ok()))
            .unwrap_or(false)
    }

    /// Disconnect the open port from the peer side.
    pub fn disconnect_port(&self) {
        if let Ok(mut guard) = self.port_inbound.lock() {
            guard.take();
        }
        for port in self.ports() {
            port.connected.store(false, Ordering::SeqCst);
        }
    }

    /// Tab ids looked up so far.
    #[must_use]
    pub fn tab_lookups(&self) -> Vec<TabId> {
        self.tab_lookups.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextMenuRegistry for MockHost {
    fn create(&self, item: ContextMenuItem) -> Result<(), HostError> {
        if let Some(error) = self.menu_error.lock().ok().and_then(|g| g.clone()) {
            return Err(error);
        }
        if let Ok(mut guard) = self.menus.lock() {
            guard.push(item);
        }
        Ok(())
    }
}

impl Localizer for MockHost {
    fn message(&self, key: &str) -> Option<String> {
        self.translations
            .lock()
            .ok()
            .and_then(|g| g.get(key).cloned())
    }
}

#[async_trait]
impl RuntimeMessenger for MockHost {
    async fn send_message(&self, request: Value) -> Result<Option<Value>, MessagingError> {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(request);
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut g| g.pop_front())
            .unwrap_or(Err(MessagingError::NoReceiver))
    }
}

impl PortConnector for MockHost {
    fn connect(&self, name: &str) -> Result<PortEndpoints, HostError> {
        if self.refuse_ports.load(Ordering::SeqCst) {
            return Err(HostError::Platform(format!("cannot open port '{name}'")));
        }
        let port = MockPort::new(name);
        let (tx, inbound) = mpsc::unbounded_channel();
        if let Ok(mut guard) = self.port_inbound.lock() {
            *guard = Some(tx);
        }
        if let Ok(mut guard) = self.ports.lock() {
            guard.push(port.clone());
        }
        Ok(PortEndpoints {
            sender: Arc::new(port),
            inbound,
        })
    }
}

#[async_trait]
impl TabLookup for MockHost {
    async fn get(&self, id: TabId) -> Result<Tab, HostError> {
        if let Ok(mut guard) = self.tab_lookups.lock() {
            guard.push(id);
        }
        self.tabs
            .lock()
            .ok()
            .and_then(|g| g.get(&id).cloned())
            .ok_or(HostError::NoSuchTab(id))
    }
}
