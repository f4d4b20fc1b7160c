//! Lazyshot Telemetry - Logging for the lazyshot background process.
//!
//! This crate provides configurable `tracing` setup with multiple formats
//! and targets, including rotating log files.
//!
//! # Example
//!
//! ```rust,no_run
//! use lazyshot_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), lazyshot_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("lazyshot_background=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("background process starting");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    BOOTSTRAP_TRACE_DIRECTIVE, FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget,
    setup_default_logging, setup_logging,
};
