//! Inbound host events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::message::{MessageSender, ReplyHandle};
use crate::tab::{ContextMenuInfo, Tab};

/// Metadata attached to every inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// When the host delivered the event.
    pub timestamp: DateTime<Utc>,
    /// Host event source that produced the event.
    pub source: String,
}

impl EventMetadata {
    /// Create new event metadata.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// An event delivered by the host to the background process.
///
/// Each event is consumed by exactly one dispatch.
#[derive(Debug)]
pub enum InboundEvent {
    /// The registered context-menu item was clicked.
    ContextMenuClick {
        /// Event metadata.
        metadata: EventMetadata,
        /// Click details.
        info: ContextMenuInfo,
        /// Tab the menu was opened in.
        tab: Tab,
    },

    /// A cross-context message arrived.
    Message {
        /// Event metadata.
        metadata: EventMetadata,
        /// Arbitrary request payload.
        request: Value,
        /// Sending context.
        sender: MessageSender,
        /// Channel for the asynchronous response.
        reply: ReplyHandle,
    },

    /// A message arrived on the page-action port.
    PortMessage {
        /// Event metadata.
        metadata: EventMetadata,
        /// Undecoded message body.
        message: Value,
    },
}

impl InboundEvent {
    /// Build a context-menu click event.
    #[must_use]
    pub fn context_menu_click(info: ContextMenuInfo, tab: Tab) -> Self {
        Self::ContextMenuClick {
            metadata: EventMetadata::new("context_menus"),
            info,
            tab,
        }
    }

    /// Build a cross-context message event.
    #[must_use]
    pub fn message(request: Value, sender: MessageSender, reply: ReplyHandle) -> Self {
        Self::Message {
            metadata: EventMetadata::new("runtime"),
            request,
            sender,
            reply,
        }
    }

    /// Build a port message event.
    #[must_use]
    pub fn port_message(message: Value) -> Self {
        Self::PortMessage {
            metadata: EventMetadata::new("port"),
            message,
        }
    }

    /// Get the event type as a string.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ContextMenuClick { .. } => "context_menu_click",
            Self::Message { .. } => "message",
            Self::PortMessage { .. } => "port_message",
        }
    }

    /// Get the event metadata.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::ContextMenuClick { metadata, .. }
            | Self::Message { metadata, .. }
            | Self::PortMessage { metadata, .. } => metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabId;
    use serde_json::json;

    #[test]
    fn event_types() {
        let click = InboundEvent::context_menu_click(
            ContextMenuInfo::new("create-screenshot"),
            Tab::new(TabId::new(1)),
        );
        assert_eq!(click.event_type(), "context_menu_click");
        assert_eq!(click.metadata().source, "context_menus");

        let (reply, _rx) = ReplyHandle::channel();
        let message = InboundEvent::message(json!({}), MessageSender::default(), reply);
        assert_eq!(message.event_type(), "message");

        let port = InboundEvent::port_message(json!({"type": "click"}));
        assert_eq!(port.event_type(), "port_message");
    }

    #[test]
    fn metadata_ids_are_unique() {
        let a = EventMetadata::new("port");
        let b = EventMetadata::new("port");
        assert_ne!(a.event_id, b.event_id);
    }
}
