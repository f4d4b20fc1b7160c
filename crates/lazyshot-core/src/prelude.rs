//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lazyshot_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Units
pub use crate::UnitName;

// Host pass-through types
pub use crate::{ContextMenuInfo, ContextMenuItem, MessageSender, ReplyHandle, Tab, TabId};

// Events
pub use crate::{EventMetadata, InboundEvent};

// Wire protocol
pub use crate::{LegacyPeerReply, LegacyPeerRequest, OutboundPortMessage, PeerReplyKind, PortMessage};
