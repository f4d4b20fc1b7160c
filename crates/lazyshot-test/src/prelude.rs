//! Prelude module - commonly used test utilities.
//!
//! Use `use lazyshot_test::prelude::*;` in test modules.

// Host mocks
pub use crate::{ManualIdleScheduler, MockHost, MockPort};

// Units and handlers
pub use crate::{MockActionHandler, MockMessageHandler, RecordingUnitLoader};

// Logging
pub use crate::LogCapture;

// Fixtures
pub use crate::{
    click_message, legacy_error, legacy_success, test_config, test_menu_info, test_tab,
};
