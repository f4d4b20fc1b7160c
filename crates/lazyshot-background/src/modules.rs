//! State shared between the bootstrap and the deferred units.
//!
//! Units receive the [`BackgroundExports`] while loading. That is how the
//! downstream logic installs its entry points and how it reaches the
//! page-action port opened at startup.

use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazyshot_core::{ContextMenuInfo, MessageSender, ReplyHandle, Tab};
use serde_json::Value;

use crate::error::HandlerResult;
use crate::host::PortSender;

/// Entry points of the main screenshot logic.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The page action was clicked in `tab`.
    async fn on_clicked(&self, tab: Tab) -> HandlerResult<()>;

    /// The context-menu item was clicked in `tab`.
    async fn on_clicked_context_menu(&self, info: ContextMenuInfo, tab: Tab)
    -> HandlerResult<()>;
}

/// Entry point of the cross-context message dispatcher.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one message. Returns whether the message was handled.
    async fn on_message(
        &self,
        request: Value,
        sender: MessageSender,
        reply: ReplyHandle,
    ) -> HandlerResult<bool>;
}

/// Process-wide exports of the background bootstrap.
pub struct BackgroundExports {
    started_at: DateTime<Utc>,
    port: OnceLock<Arc<dyn PortSender>>,
    actions: OnceLock<Arc<dyn ActionHandler>>,
    messages: OnceLock<Arc<dyn MessageHandler>>,
}

impl BackgroundExports {
    /// Create exports stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            port: OnceLock::new(),
            actions: OnceLock::new(),
            messages: OnceLock::new(),
        }
    }

    /// When the background process started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The page-action port, once it has been opened.
    #[must_use]
    pub fn port(&self) -> Option<Arc<dyn PortSender>> {
        self.port.get().cloned()
    }

    pub(crate) fn attach_port(&self, port: Arc<dyn PortSender>) -> bool {
        self.port.set(port).is_ok()
    }

    /// Install the main action handler. Returns `false` if one was
    /// already installed; the first installation wins.
    pub fn install_actions(&self, handler: Arc<dyn ActionHandler>) -> bool {
        self.actions.set(handler).is_ok()
    }

    /// The installed action handler.
    #[must_use]
    pub fn actions(&self) -> Option<Arc<dyn ActionHandler>> {
        self.actions.get().cloned()
    }

    /// Install the message handler. Returns `false` if one was already
    /// installed; the first installation wins.
    pub fn install_messages(&self, handler: Arc<dyn MessageHandler>) -> bool {
        self.messages.set(handler).is_ok()
    }

    /// The installed message handler.
    #[must_use]
    pub fn messages(&self) -> Option<Arc<dyn MessageHandler>> {
        self.messages.get().cloned()
    }
}

impl Default for BackgroundExports {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BackgroundExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundExports")
            .field("started_at", &self.started_at)
            .field("port", &self.port.get().map(|p| p.name().to_string()))
            .field("actions", &self.actions.get().is_some())
            .field("messages", &self.messages.get().is_some())
            .finish()
    }
}
