//! Mock downstream handlers.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use lazyshot_background::{ActionHandler, HandlerError, HandlerResult, MessageHandler};
use lazyshot_core::{ContextMenuInfo, MessageSender, ReplyHandle, Tab};
use serde_json::Value;

/// How a mock handler behaves when called.
#[derive(Debug, Clone, Default)]
enum Behavior {
    #[default]
    Succeed,
    Fail(String),
    Panic,
}

impl Behavior {
    fn apply(&self) -> HandlerResult<()> {
        match self {
            Self::Succeed => Ok(()),
            Self::Fail(message) => Err(HandlerError::new(message.clone())),
            Self::Panic => panic!("mock handler panicked"),
        }
    }
}

/// Mock action handler that records every click.
#[derive(Debug, Clone, Default)]
pub struct MockActionHandler {
    clicks: Arc<Mutex<Vec<Tab>>>,
    menu_clicks: Arc<Mutex<Vec<(ContextMenuInfo, Tab)>>>,
    behavior: Behavior,
}

impl MockActionHandler {
    /// Create a handler that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that records the call and then fails.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            ..Self::default()
        }
    }

    /// Create a handler that records the call and then panics.
    #[must_use]
    pub fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
            ..Self::default()
        }
    }

    /// This handler as a shareable trait object. Shares recorded state.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn ActionHandler> {
        Arc::new(self.clone())
    }

    /// Tabs passed to `on_clicked`.
    #[must_use]
    pub fn clicks(&self) -> Vec<Tab> {
        self.clicks.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Arguments passed to `on_clicked_context_menu`.
    #[must_use]
    pub fn menu_clicks(&self) -> Vec<(ContextMenuInfo, Tab)> {
        self.menu_clicks.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ActionHandler for MockActionHandler {
    async fn on_clicked(&self, tab: Tab) -> HandlerResult<()> {
        if let Ok(mut guard) = self.clicks.lock() {
            guard.push(tab);
        }
        self.behavior.apply()
    }

    async fn on_clicked_context_menu(&self, info: ContextMenuInfo, tab: Tab) -> HandlerResult<()> {
        if let Ok(mut guard) = self.menu_clicks.lock() {
            guard.push((info, tab));
        }
        self.behavior.apply()
    }
}

/// Mock message handler that records requests and optionally replies.
#[derive(Debug, Clone, Default)]
pub struct MockMessageHandler {
    requests: Arc<Mutex<Vec<(Value, MessageSender)>>>,
    response: Option<Value>,
    behavior: Behavior,
}

impl MockMessageHandler {
    /// Create a handler that accepts every message without replying.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every message with `response`.
    #[must_use]
    pub fn replying(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// Create a handler that records the call and then fails.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            ..Self::default()
        }
    }

    /// Create a handler that records the call and then panics.
    #[must_use]
    pub fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
            ..Self::default()
        }
    }

    /// This handler as a shareable trait object. Shares recorded state.
    #[must_use]
    pub fn handler(&self) -> Arc<dyn MessageHandler> {
        Arc::new(self.clone())
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .map(|g| g.iter().map(|(request, _)| request.clone()).collect())
            .unwrap_or_default()
    }

    /// Senders of the requests received so far.
    #[must_use]
    pub fn senders(&self) -> Vec<MessageSender> {
        self.requests
            .lock()
            .map(|g| g.iter().map(|(_, sender)| sender.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessageHandler for MockMessageHandler {
    async fn on_message(
        &self,
        request: Value,
        sender: MessageSender,
        reply: ReplyHandle,
    ) -> HandlerResult<bool> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push((request, sender));
        }
        self.behavior.apply()?;
        if let Some(response) = &self.response {
            reply.send(response.clone());
        }
        Ok(true)
    }
}
