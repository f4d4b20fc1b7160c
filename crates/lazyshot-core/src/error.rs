//! Core error types.

use thiserror::Error;

/// Errors raised while validating identifiers or decoding wire messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A unit name was empty or contained control characters.
    #[error("Invalid unit name: {0}")]
    InvalidUnitName(String),

    /// A port message carried no string `type` field.
    #[error("Port message has no type")]
    MissingMessageType,

    /// A port message carried a `type` this process does not understand.
    #[error("Unrecognized message type: {0}")]
    UnrecognizedMessage(String),

    /// A port message had a known `type` but an unexpected shape.
    #[error("Malformed {kind} message: {reason}")]
    MalformedMessage {
        /// The message type that failed to decode.
        kind: String,
        /// Decoder error text.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
