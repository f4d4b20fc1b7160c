use std::io;
use thiserror::Error;

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A config file, or the merged tree, is not valid TOML for [`Config`](crate::Config).
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File name, or a `<...>` marker for embedded or merged input.
        path: String,
        /// TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A field holds a value the background process cannot run with.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
