//! Lazyshot Background - deferred bootstrap and event routing.
//!
//! This crate provides:
//! - A run-once, ordered [`BootstrapSequencer`] that loads the background
//!   units on first demand
//! - An [`EventRouter`] that gates every inbound event behind readiness
//! - The long-lived page-action [`PortSession`]
//! - An idle-time [`MigrationProbe`] for legacy state
//! - [`Background::start`], which wires all of the above to the host
//!
//! # Architecture
//!
//! The host platform is reached only through the narrow traits in
//! [`host`]. Units receive the shared [`BackgroundExports`] while they load
//! and install their entry points there:
//!
//! ```text
//! host event --> EventRouter --> BootstrapSequencer::ensure_ready()
//!                    |                     |
//!                    |          (first call) UnitLoader, unit by unit
//!                    v
//!         ActionHandler / MessageHandler from BackgroundExports
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lazyshot_background::{BackgroundExports, BootstrapSequencer, EmptyUnit, StaticUnitLoader};
//! use lazyshot_core::UnitName;
//!
//! # async fn example() {
//! let unit = UnitName::from_static("log.js");
//! let loader = StaticUnitLoader::new().with_unit(unit.clone(), EmptyUnit);
//! let sequencer = BootstrapSequencer::new(
//!     vec![unit],
//!     Arc::new(loader),
//!     Arc::new(BackgroundExports::new()),
//! );
//!
//! // Every caller shares the same load.
//! let (a, b) = tokio::join!(sequencer.ensure_ready(), sequencer.ensure_ready());
//! assert!(a.is_ok() && b.is_ok());
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod host;
pub mod prelude;

mod background;
mod error;
mod idle;
mod loader;
mod modules;
mod port;
mod probe;
mod router;
mod sequencer;

pub use background::Background;
pub use error::{
    BackgroundError, BackgroundResult, DispatchError, HandlerError, HandlerResult, HostError,
    LoadError, MessagingError, ProbeError, UnitLoadFailure,
};
pub use host::{
    ContextMenuRegistry, HostServices, IdleScheduler, IdleTrigger, Localizer, PortConnector,
    PortEndpoints, PortSender, RuntimeMessenger, TabLookup,
};
pub use idle::TokioIdleScheduler;
pub use loader::{EmptyUnit, StaticUnitLoader, UnitInitializer, UnitLoader};
pub use modules::{ActionHandler, BackgroundExports, MessageHandler};
pub use port::PortSession;
pub use probe::{MigrationProbe, ProbeOutcome};
pub use router::{EventRouter, RouteOutcome};
pub use sequencer::{BootstrapSequencer, ReadinessState, ReadyFuture, ReadyResult};
