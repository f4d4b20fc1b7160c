//! Error types for the background bootstrap.

use std::any::Any;
use std::sync::Arc;

use lazyshot_core::{CoreError, TabId, UnitName};
use thiserror::Error;

/// Failure reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The named port is closed.
    #[error("port '{0}' is disconnected")]
    PortDisconnected(String),

    /// No tab exists with the given id.
    #[error("no tab with id {0}")]
    NoSuchTab(TabId),

    /// Any other platform failure.
    #[error("{0}")]
    Platform(String),
}

/// Failure of an outbound cross-context message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// No context is listening on the other end.
    #[error("Could not establish connection. Receiving end does not exist")]
    NoReceiver,

    /// The message could not be delivered or answered.
    #[error("messaging transport failed: {0}")]
    Transport(String),
}

/// Why a single unit failed to load.
#[derive(Debug, Error)]
pub enum UnitLoadFailure {
    /// No loader knows the unit.
    #[error("unit is not registered")]
    NotFound,

    /// The unit's initialization reported an error.
    #[error("{0}")]
    Initialization(String),

    /// A host call made while loading failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl UnitLoadFailure {
    /// Build an initialization failure from any message.
    pub fn init(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }
}

/// A unit failed to load, ending the bootstrap for this process.
#[derive(Debug, Error)]
#[error("Error loading unit {unit}: {source}")]
pub struct LoadError {
    /// The unit that failed.
    pub unit: UnitName,
    /// The underlying cause.
    #[source]
    pub source: UnitLoadFailure,
}

/// Failure reported by a downstream handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create a handler error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Result type for downstream handlers.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Why routing an inbound event failed.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The background units could not be loaded.
    #[error(transparent)]
    Load(Arc<LoadError>),

    /// The units loaded but none installed the required handler.
    #[error("no unit installed the {0} handler")]
    NotInstalled(&'static str),

    /// The tab referenced by a port message could not be resolved.
    #[error("tab lookup failed: {0}")]
    TabLookup(HostError),

    /// The downstream handler returned an error.
    #[error("handler failed: {0}")]
    Handler(HandlerError),

    /// The downstream handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Why the legacy migration probe failed.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The peer answered with nothing.
    #[error("Got no result from {func_name}")]
    NoResult {
        /// Remote function that was called.
        func_name: String,
    },

    /// The peer reported an error.
    #[error("Error from {func_name}: {name}")]
    Peer {
        /// Remote function that was called.
        func_name: String,
        /// Error name reported by the peer.
        name: String,
    },

    /// The reply did not match the expected shape.
    #[error("unexpected reply from {func_name}: {reason}")]
    UnexpectedReply {
        /// Remote function that was called.
        func_name: String,
        /// What was wrong with the reply.
        reason: String,
    },

    /// The message could not be delivered.
    #[error(transparent)]
    Messaging(MessagingError),

    /// Legacy state was found but the units failed to load.
    #[error(transparent)]
    Load(Arc<LoadError>),
}

/// Errors raised while starting the background process.
#[derive(Debug, Error)]
pub enum BackgroundError {
    /// A configured unit name was rejected.
    #[error("invalid unit in configuration: {0}")]
    InvalidUnit(#[from] CoreError),

    /// The host rejected a startup registration.
    #[error("host registration failed: {0}")]
    Host(#[from] HostError),
}

/// Result type for background startup.
pub type BackgroundResult<T> = Result<T, BackgroundError>;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_names_the_unit_and_cause() {
        let err = LoadError {
            unit: UnitName::from_static("build/shot.js"),
            source: UnitLoadFailure::init("syntax error"),
        };
        assert_eq!(
            err.to_string(),
            "Error loading unit build/shot.js: syntax error"
        );
    }

    #[test]
    fn probe_error_texts() {
        let err = ProbeError::NoResult {
            func_name: "getOldDeviceInfo".into(),
        };
        assert_eq!(err.to_string(), "Got no result from getOldDeviceInfo");

        let err = ProbeError::Peer {
            func_name: "getOldDeviceInfo".into(),
            name: "NotFoundError".into(),
        };
        assert_eq!(err.to_string(), "Error from getOldDeviceInfo: NotFoundError");
    }

    #[test]
    fn panic_payload_text() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn dispatch_error_is_transparent_for_load_failures() {
        let load = Arc::new(LoadError {
            unit: UnitName::from_static("C"),
            source: UnitLoadFailure::NotFound,
        });
        let err = DispatchError::Load(Arc::clone(&load));
        assert_eq!(err.to_string(), load.to_string());
    }
}
