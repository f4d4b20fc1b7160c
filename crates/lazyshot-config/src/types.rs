//! Configuration types for the lazyshot background process.
//!
//! Every struct implements [`Default`] matching `defaults.toml`, so a bare
//! `[section]` header in TOML produces a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered list of deferred units.
    pub units: UnitsSection,
    /// Context-menu item registration.
    pub context_menu: ContextMenuSection,
    /// Page-action port settings.
    pub port: PortSection,
    /// Idle-time legacy migration probe.
    pub migration: MigrationSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Deferred unit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsSection {
    /// Units in load order.
    pub order: Vec<String>,
}

/// The unit list of the screenshot background page.
pub const DEFAULT_UNITS: &[&str] = &[
    "log.js",
    "makeUuid.js",
    "catcher.js",
    "blobConverters.js",
    "background/selectorLoader.js",
    "background/communication.js",
    "background/auth.js",
    "background/senderror.js",
    "build/raven.js",
    "build/shot.js",
    "build/thumbnailGenerator.js",
    "background/analytics.js",
    "background/deviceInfo.js",
    "background/takeshot.js",
    "background/main.js",
];

impl Default for UnitsSection {
    fn default() -> Self {
        Self {
            order: DEFAULT_UNITS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Context-menu item registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMenuSection {
    /// Item id reported back on click.
    pub id: String,
    /// Localized message key used for the item title.
    pub title_message: String,
    /// Contexts the item appears in.
    pub contexts: Vec<String>,
    /// URL match patterns restricting where the item appears.
    pub document_url_patterns: Vec<String>,
}

impl Default for ContextMenuSection {
    fn default() -> Self {
        Self {
            id: "create-screenshot".to_string(),
            title_message: "contextMenuLabel".to_string(),
            contexts: vec!["page".to_string()],
            document_url_patterns: vec!["<all_urls>".to_string()],
        }
    }
}

/// Page-action port settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortSection {
    /// Name the port is opened with.
    pub name: String,
}

impl Default for PortSection {
    fn default() -> Self {
        Self {
            name: "photonPageActionPort".to_string(),
        }
    }
}

/// Legacy migration probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSection {
    /// Whether the probe is scheduled at startup.
    pub enabled: bool,
    /// Longest wait for host idleness before probing anyway, in milliseconds.
    pub idle_timeout_ms: u64,
    /// Remote function asked for legacy device info.
    pub func_name: String,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_timeout_ms: 2000,
            func_name: "getOldDeviceInfo".to_string(),
        }
    }
}

impl MigrationSection {
    /// The idle wait bound as a [`std::time::Duration`].
    #[must_use]
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.idle_timeout_ms)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`, `full`).
    pub format: String,
    /// Extra filter directives (e.g. `lazyshot_background=debug`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directives: Vec::new(),
        }
    }
}
