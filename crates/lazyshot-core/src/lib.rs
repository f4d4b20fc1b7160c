//! Lazyshot Core - Shared domain types for the lazyshot background process.
//!
//! This crate provides:
//! - Unit identifiers for the deferred background logic
//! - Tab, context-menu, and sender types passed through from the host
//! - Inbound event types consumed by the event router
//! - The wire protocol for the page-action port and the legacy peer
//!
//! # Example
//!
//! ```rust
//! use lazyshot_core::{PortMessage, TabId};
//! use serde_json::json;
//!
//! let message = PortMessage::parse(&json!({"type": "click", "tab": {"id": 7}})).unwrap();
//! assert_eq!(message, PortMessage::Click { tab_id: TabId::new(7) });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod event;
mod message;
mod protocol;
mod tab;
mod unit;

pub use error::{CoreError, CoreResult};
pub use event::{EventMetadata, InboundEvent};
pub use message::{MessageSender, ReplyHandle};
pub use protocol::{
    LegacyPeerReply, LegacyPeerRequest, OutboundPortMessage, PeerReplyKind, PortMessage,
    is_truthy,
};
pub use tab::{ContextMenuInfo, ContextMenuItem, Tab, TabId};
pub use unit::UnitName;
