//! Lazyshot Test - Shared test utilities for the background process.
//!
//! This crate provides mock host collaborators, a recording unit loader,
//! mock downstream handlers and log capture, for use as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lazyshot_background::Background;
//! use lazyshot_test::{MockActionHandler, MockHost, RecordingUnitLoader, test_config};
//!
//! #[tokio::test]
//! async fn click_loads_units() {
//!     let host = MockHost::new().with_tab(test_tab(1));
//!     let actions = MockActionHandler::new();
//!     let loader = RecordingUnitLoader::new().with_actions_on("main.js", actions.handler());
//!     let background =
//!         Background::start(&test_config(&["log.js", "main.js"]), host.services(), loader.shared())
//!             .unwrap();
//!
//!     host.send_port_message(click_message(1));
//!     // ...
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod handlers;
pub mod idle;
pub mod loader;
pub mod logs;
pub mod mocks;

pub use fixtures::*;
pub use handlers::*;
pub use idle::*;
pub use loader::*;
pub use logs::*;
pub use mocks::*;
