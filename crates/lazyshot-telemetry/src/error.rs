//! Errors raised while installing the subscriber.

use std::path::PathBuf;
use thiserror::Error;

/// Why logging could not be set up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a directive is not a valid filter.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The offending filter text.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// The format name is not one of `pretty`, `compact`, `json`, `full`.
    #[error("unknown log format '{0}'")]
    UnknownFormat(String),

    /// The log directory could not be created.
    #[error("cannot create log directory {path}: {source}")]
    LogDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Another global subscriber is already in place.
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Result alias for logging setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
