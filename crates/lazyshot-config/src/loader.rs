//! Config file discovery and layered loading.
//!
//! Layers, lowest first: embedded `defaults.toml`, the user file in the
//! platform config directory, the explicit file, then environment
//! fallbacks for whatever no file set. The merged tree is deserialized
//! and validated once at the end.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, LayeredToml};
use crate::types::Config;
use crate::validate;

const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Config files above 1 MiB are rejected unread.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// A validated configuration together with where each field came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Layer that set each leaf field.
    pub field_sources: FieldSources,
    /// Config files merged, in order.
    pub loaded_files: Vec<PathBuf>,
}

impl ResolvedConfig {
    /// Layer that set `path` (e.g. `port.name`).
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<ConfigLayer> {
        self.field_sources.get(path).copied()
    }
}

/// Load the configuration from every layer.
///
/// `explicit` must exist when given. `config_dir_override` replaces the
/// platform config directory when looking for the user file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a file cannot be read or parsed, or if the
/// merged configuration is invalid.
pub fn load(
    explicit: Option<&Path>,
    config_dir_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit, config_dir_override, &collect_env_vars())
}

/// [`load`] with a caller-supplied environment.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with_env<S: BuildHasher>(
    explicit: Option<&Path>,
    config_dir_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    let defaults = parse_toml(DEFAULTS_TOML, Path::new("<embedded defaults>"))?;
    let mut layered = LayeredToml::new(defaults, ConfigLayer::Defaults);
    let mut loaded_files = Vec::new();

    let user_file = config_dir_override
        .map(|dir| dir.join("config.toml"))
        .or_else(user_config_path);
    if let Some(path) = user_file {
        if path.exists() {
            layered.apply(read_toml(&path)?, ConfigLayer::User);
            info!(path = %path.display(), "loaded user config");
            loaded_files.push(path);
        } else {
            debug!(path = %path.display(), "no user config");
        }
    }

    if let Some(path) = explicit {
        layered.apply(read_toml(path)?, ConfigLayer::Explicit);
        info!(path = %path.display(), "loaded config file");
        loaded_files.push(path.to_path_buf());
    }

    let filled = apply_env_fallbacks(&mut layered, env_vars);
    if filled > 0 {
        debug!(count = filled, "filled fields from environment");
    }

    let (tree, field_sources) = layered.into_parts();
    let config: Config = tree
        .try_into()
        .map_err(|source: toml::de::Error| ConfigError::Parse {
            path: "<merged config>".to_owned(),
            source,
        })?;
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load and validate a single file, ignoring every other layer.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or
/// validated.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let config: Config =
        toml::from_str(&read_bounded(path)?).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// `~/.config/lazyshot/config.toml` on Linux.
fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "lazyshot")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_toml(path: &Path) -> ConfigResult<toml::Value> {
    parse_toml(&read_bounded(path)?, path)
}

fn parse_toml(content: &str, origin: &Path) -> ConfigResult<toml::Value> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.display().to_string(),
        source,
    })
}

fn read_bounded(path: &Path) -> ConfigResult<String> {
    let read_error = |source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid {
            field: path.display().to_string(),
            message: format!("file is {size} bytes, limit is {MAX_CONFIG_FILE_SIZE}"),
        });
    }
    std::fs::read_to_string(path).map_err(read_error)
}
