//! Cross-context message sender identity and reply channel.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::tab::Tab;

/// Identity of the context that sent a cross-context message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    /// Extension id of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// URL of the sending document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Tab of the sending content script, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<Tab>,
    /// Frame of the sending content script, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<i64>,
}

/// One-shot channel used by a message handler to answer the sender.
///
/// The host listener keeps the receiving half; dropping the handle without
/// replying closes the channel and the sender observes no response.
pub struct ReplyHandle {
    tx: oneshot::Sender<Value>,
}

impl ReplyHandle {
    /// Create a reply handle and the receiver the host waits on.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<Value>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Send the response. Returns `false` if the sender stopped waiting.
    pub fn send(self, response: Value) -> bool {
        self.tx.send(response).is_ok()
    }

    /// Whether the sender is still waiting for a response.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl fmt::Debug for ReplyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyHandle")
            .field("open", &self.is_open())
            .finish()
    }
}
