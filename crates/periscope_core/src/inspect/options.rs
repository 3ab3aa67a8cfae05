//! Inspector configuration.
//!
//! Options are plain data: they can be built in code, deserialized from a
//! TOML document, or loaded from a file on disk.
//!
//! ```toml
//! accessor_policy = "resolved"
//! prototype_policy = "always"
//! filter_baseline_accessors = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an own accessor property is turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorPolicy {
    /// One record with the resolved value, followed by `get <key>` and
    /// `set <key>` records holding the accessor functions that exist.
    #[default]
    Split,
    /// One record with the resolved value only.
    Resolved,
}

/// When the `[[Prototype]]` record is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrototypePolicy {
    /// Omit the record when the prototype is the baseline root prototype.
    #[default]
    SkipBaseline,
    /// Append the record whenever a prototype exists.
    Always,
}

/// Tunables of an [`Inspector`][super::Inspector].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorOptions {
    pub accessor_policy: AccessorPolicy,
    pub prototype_policy: PrototypePolicy,
    /// Hide own accessors that share both functions with the baseline root
    /// prototype's accessor of the same key.
    pub filter_baseline_accessors: bool,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            accessor_policy: AccessorPolicy::default(),
            prototype_policy: PrototypePolicy::default(),
            filter_baseline_accessors: true,
        }
    }
}

/// Errors raised while loading [`InspectorOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid inspector options: {0}")]
    Parse(#[from] toml::de::Error),
}

impl InspectorOptions {
    /// Parses options from a TOML document.  Missing fields take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_accessor_policy(mut self, policy: AccessorPolicy) -> Self {
        self.accessor_policy = policy;
        self
    }

    pub fn with_prototype_policy(mut self, policy: PrototypePolicy) -> Self {
        self.prototype_policy = policy;
        self
    }

    pub fn with_baseline_filter(mut self, enabled: bool) -> Self {
        self.filter_baseline_accessors = enabled;
        self
    }
}
