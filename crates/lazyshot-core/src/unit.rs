//! Unit identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Name of one loadable piece of deferred background logic.
///
/// Unit names are opaque to the bootstrap; they are typically the relative
/// path of a script or module (`background/main.js`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitName(String);

impl<'de> Deserialize<'de> for UnitName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl UnitName {
    /// Create a validated unit name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUnitName`] if the name is blank or
    /// contains control characters.
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidUnitName(
                "unit name must not be empty".into(),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(CoreError::InvalidUnitName(format!(
                "unit name must not contain control characters, got: {name:?}"
            )));
        }
        Ok(Self(name))
    }

    /// Create a unit name from a compile-time constant without validation.
    #[must_use]
    pub fn from_static(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
