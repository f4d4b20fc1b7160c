//! Post-merge configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound on the migration idle wait (one minute).
const MAX_IDLE_TIMEOUT_MS: u64 = 60_000;

const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_units(config)?;
    validate_context_menu(config)?;
    validate_port(config)?;
    validate_migration(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_units(config: &Config) -> ConfigResult<()> {
    let order = &config.units.order;
    if order.is_empty() {
        return Err(invalid("units.order", "at least one unit is required"));
    }

    let mut seen = HashSet::new();
    for name in order {
        if name.trim().is_empty() {
            return Err(invalid("units.order", "unit names must not be blank"));
        }
        if !seen.insert(name.as_str()) {
            return Err(invalid(
                "units.order",
                format!("unit '{name}' is listed more than once"),
            ));
        }
    }
    Ok(())
}

fn validate_context_menu(config: &Config) -> ConfigResult<()> {
    let menu = &config.context_menu;
    if menu.id.trim().is_empty() {
        return Err(invalid("context_menu.id", "menu item id must not be empty"));
    }
    if menu.title_message.trim().is_empty() {
        return Err(invalid(
            "context_menu.title_message",
            "title message key must not be empty",
        ));
    }
    if menu.contexts.is_empty() {
        return Err(invalid(
            "context_menu.contexts",
            "at least one context is required",
        ));
    }
    Ok(())
}

fn validate_port(config: &Config) -> ConfigResult<()> {
    if config.port.name.trim().is_empty() {
        return Err(invalid("port.name", "port name must not be empty"));
    }
    Ok(())
}

fn validate_migration(config: &Config) -> ConfigResult<()> {
    let m = &config.migration;
    if m.idle_timeout_ms == 0 || m.idle_timeout_ms > MAX_IDLE_TIMEOUT_MS {
        return Err(invalid(
            "migration.idle_timeout_ms",
            format!("idle timeout must be between 1 and {MAX_IDLE_TIMEOUT_MS} ms"),
        ));
    }
    if m.enabled && m.func_name.trim().is_empty() {
        return Err(invalid(
            "migration.func_name",
            "func_name must not be empty when migration is enabled",
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    if l.level.trim().is_empty() {
        return Err(invalid("logging.level", "level must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::Invalid { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn empty_unit_list_rejected() {
        let mut config = Config::default();
        config.units.order.clear();
        assert_eq!(field_of(validate(&config).unwrap_err()), "units.order");
    }

    #[test]
    fn duplicate_unit_rejected() {
        let mut config = Config::default();
        config.units.order = vec!["a.js".into(), "b.js".into(), "a.js".into()];
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("'a.js'"));
    }

    #[test]
    fn blank_port_name_rejected() {
        let mut config = Config::default();
        config.port.name = " ".into();
        assert_eq!(field_of(validate(&config).unwrap_err()), "port.name");
    }

    #[test]
    fn idle_timeout_bounds() {
        let mut config = Config::default();
        config.migration.idle_timeout_ms = 0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "migration.idle_timeout_ms"
        );
        config.migration.idle_timeout_ms = MAX_IDLE_TIMEOUT_MS;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn disabled_migration_allows_blank_func_name() {
        let mut config = Config::default();
        config.migration.enabled = false;
        config.migration.func_name = String::new();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        assert_eq!(field_of(validate(&config).unwrap_err()), "logging.format");
    }
}
