//! Environment variable fallbacks.
//!
//! Only fields that no config file set are filled from the environment.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, LayeredToml};

/// `(variable, section, key)` triples.
const ENV_FALLBACKS: &[(&str, &str, &str)] = &[
    ("LAZYSHOT_LOG_LEVEL", "logging", "level"),
    ("LAZYSHOT_LOG_FORMAT", "logging", "format"),
    ("LAZYSHOT_PORT_NAME", "port", "name"),
];

/// Collect the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Fill unset fields from `env_vars`. Blank values are ignored.
///
/// Returns how many fields were filled.
pub fn apply_env_fallbacks<S: BuildHasher>(
    layered: &mut LayeredToml,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    ENV_FALLBACKS
        .iter()
        .filter(|(var, section, key)| {
            let Some(value) = env_vars.get(*var) else {
                return false;
            };
            let value = value.trim();
            if value.is_empty() {
                return false;
            }
            let applied = layered.fill_unset(section, key, value, ConfigLayer::Environment);
            if applied {
                debug!(var, section, key, "applied env fallback");
            }
            applied
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> LayeredToml {
        LayeredToml::new(
            toml::from_str(
                "[logging]\nlevel = \"info\"\nformat = \"pretty\"\n[port]\nname = \"photonPageActionPort\"\n",
            )
            .unwrap(),
            ConfigLayer::Defaults,
        )
    }

    #[test]
    fn fills_fields_still_at_default() {
        let mut layered = defaults();
        let env = HashMap::from([
            ("LAZYSHOT_LOG_LEVEL".to_string(), "debug".to_string()),
            ("LAZYSHOT_PORT_NAME".to_string(), " customPort ".to_string()),
        ]);

        assert_eq!(apply_env_fallbacks(&mut layered, &env), 2);
        assert_eq!(layered.tree()["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(layered.tree()["port"]["name"].as_str(), Some("customPort"));
        assert_eq!(
            layered.source_of("logging.level"),
            Some(ConfigLayer::Environment)
        );
    }

    #[test]
    fn file_values_win_over_env() {
        let mut layered = defaults();
        layered.apply(
            toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap(),
            ConfigLayer::User,
        );
        let env = HashMap::from([("LAZYSHOT_LOG_LEVEL".to_string(), "trace".to_string())]);

        assert_eq!(apply_env_fallbacks(&mut layered, &env), 0);
        assert_eq!(layered.tree()["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut layered = defaults();
        let env = HashMap::from([("LAZYSHOT_LOG_FORMAT".to_string(), "  ".to_string())]);

        assert_eq!(apply_env_fallbacks(&mut layered, &env), 0);
        assert_eq!(layered.source_of("logging.format"), Some(ConfigLayer::Defaults));
    }
}
