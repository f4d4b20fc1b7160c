//! Layered TOML trees that remember which layer set each leaf.
//!
//! Merging happens on raw [`toml::Value`]s before deserialization, so a key
//! a file leaves out keeps the value from the layer below.

use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// User-level configuration file.
    User,
    /// File passed explicitly at startup.
    Explicit,
    /// Environment variable fallback.
    Environment,
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Defaults => "defaults",
            Self::User => "user config",
            Self::Explicit => "explicit config file",
            Self::Environment => "environment variable",
        })
    }
}

/// Dotted field path (`port.name`) to the layer that last set it.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// A TOML tree built up layer by layer.
#[derive(Debug, Clone)]
pub struct LayeredToml {
    tree: toml::Value,
    sources: FieldSources,
}

impl LayeredToml {
    /// Start from `base`, attributing every leaf to `layer`.
    #[must_use]
    pub fn new(base: toml::Value, layer: ConfigLayer) -> Self {
        let mut sources = FieldSources::new();
        attribute(&base, "", layer, &mut sources);
        Self {
            tree: base,
            sources,
        }
    }

    /// Merge `overlay` on top.
    ///
    /// Tables merge key by key. Scalars and arrays replace what was there.
    pub fn apply(&mut self, overlay: toml::Value, layer: ConfigLayer) {
        merge_value(&mut self.tree, overlay, "", layer, &mut self.sources);
    }

    /// Layer that last set `path`, if any.
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<ConfigLayer> {
        self.sources.get(path).copied()
    }

    /// Set `section.key` to a string unless a file layer already set it.
    ///
    /// Returns whether the value was written.
    pub fn fill_unset(&mut self, section: &str, key: &str, value: &str, layer: ConfigLayer) -> bool {
        let path = join(section, key);
        if self
            .source_of(&path)
            .is_some_and(|existing| existing != ConfigLayer::Defaults)
        {
            return false;
        }
        let Some(root) = self.tree.as_table_mut() else {
            return false;
        };
        let Some(table) = root
            .entry(section)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
            .as_table_mut()
        else {
            return false;
        };
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        self.sources.insert(path, layer);
        true
    }

    /// The merged tree.
    #[must_use]
    pub fn tree(&self) -> &toml::Value {
        &self.tree
    }

    /// Split into the merged tree and its source map.
    #[must_use]
    pub fn into_parts(self) -> (toml::Value, FieldSources) {
        (self.tree, self.sources)
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn merge_value(
    base: &mut toml::Value,
    overlay: toml::Value,
    path: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let child_path = join(path, &key);
                if let Some(existing) = base_table.get_mut(&key) {
                    merge_value(existing, value, &child_path, layer, sources);
                } else {
                    attribute(&value, &child_path, layer, sources);
                    base_table.insert(key, value);
                }
            }
        },
        (base, overlay) => {
            attribute(&overlay, path, layer, sources);
            *base = overlay;
        },
    }
}

fn attribute(value: &toml::Value, path: &str, layer: ConfigLayer, sources: &mut FieldSources) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                attribute(child, &join(path, key), layer, sources);
            }
        },
        _ => {
            sources.insert(path.to_string(), layer);
        },
    }
}
