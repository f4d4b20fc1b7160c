//! Test fixtures for common types.

use lazyshot_config::Config;
use lazyshot_core::{ContextMenuInfo, Tab, TabId};
use serde_json::{Value, json};

/// Create a test tab with a URL and title.
#[must_use]
pub fn test_tab(id: i64) -> Tab {
    Tab::new(TabId::new(id))
        .with_url(format!("https://example.com/{id}"))
        .with_title(format!("Tab {id}"))
}

/// Create context-menu click info for the screenshot item.
#[must_use]
pub fn test_menu_info() -> ContextMenuInfo {
    ContextMenuInfo::new("create-screenshot").with_page_url("https://example.com/")
}

/// A page-action port `click` message for `tab_id`.
#[must_use]
pub fn click_message(tab_id: i64) -> Value {
    json!({"type": "click", "tab": {"id": tab_id}})
}

/// A legacy peer success reply carrying `value`.
#[must_use]
pub fn legacy_success(value: Value) -> Value {
    json!({"type": "success", "value": value})
}

/// A legacy peer error reply.
#[must_use]
pub fn legacy_error(name: &str) -> Value {
    json!({"type": "error", "name": name})
}

/// Default configuration with the given unit list.
#[must_use]
pub fn test_config(units: &[&str]) -> Config {
    let mut config = Config::default();
    config.units.order = units.iter().map(|u| (*u).to_string()).collect();
    config
}
