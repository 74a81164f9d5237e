//! Live configuration store and the on-disk YAML override document.
//!
//! A plugin's configuration has two layers: compiled-in defaults seeded into
//! the host's live [`ConfigStore`] at activation, and user overrides kept in
//! a `config.yml` document inside the host's data directory. The document is
//! shared with the host and other plugins, so updates round-trip the whole
//! file and leave unrecognized keys untouched.
//!
//! Updates are not transactional: two overlapping writers race and the last
//! write wins.

use crate::error::ConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A scalar configuration value.
///
/// Plugin settings are flat key/value pairs; nested structures belong to the
/// host's own configuration and are never handed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl ConfigValue {
    /// Returns the human-readable type name used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
        }
    }

    /// Returns true if `other` is acceptable where `self` is the declared
    /// default. Integers are accepted for float-typed keys.
    pub fn accepts(&self, other: &ConfigValue) -> bool {
        matches!(
            (self, other),
            (ConfigValue::Bool(_), ConfigValue::Bool(_))
                | (ConfigValue::Int(_), ConfigValue::Int(_))
                | (ConfigValue::Float(_), ConfigValue::Float(_))
                | (ConfigValue::Float(_), ConfigValue::Int(_))
                | (ConfigValue::String(_), ConfigValue::String(_))
        )
    }

    /// Converts a YAML scalar into a config value. Returns `None` for
    /// sequences, mappings, nulls, and tagged values.
    pub fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Bool(b) => Some(ConfigValue::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ConfigValue::Int(i))
                } else {
                    n.as_f64().map(ConfigValue::Float)
                }
            }
            serde_yaml::Value::String(s) => Some(ConfigValue::String(s.clone())),
            _ => None,
        }
    }

    /// Converts a JSON scalar into a config value. Returns `None` for
    /// arrays, objects, and nulls.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(ConfigValue::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ConfigValue::Int(i))
                } else {
                    n.as_f64().map(ConfigValue::Float)
                }
            }
            serde_json::Value::String(s) => Some(ConfigValue::String(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&ConfigValue> for serde_yaml::Value {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => serde_yaml::Value::Bool(*b),
            ConfigValue::Int(i) => serde_yaml::Value::Number((*i).into()),
            ConfigValue::Float(f) => serde_yaml::Value::Number((*f).into()),
            ConfigValue::String(s) => serde_yaml::Value::String(s.clone()),
        }
    }
}

/// The host's live configuration object.
///
/// A cheaply cloneable handle to a shared key/value map. The host seeds its
/// own settings here; plugins seed their defaults at activation and mirror
/// every accepted update so route handlers always read current values.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<BTreeMap<String, ConfigValue>>>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.inner.read().get(key).cloned()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.inner.write().insert(key.into(), value.into());
    }

    /// Inserts every pair from `entries`.
    pub fn extend<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        self.inner.write().extend(entries);
    }

    /// Returns a point-in-time copy of the whole map.
    pub fn snapshot(&self) -> BTreeMap<String, ConfigValue> {
        self.inner.read().clone()
    }

    /// Returns true if `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }
}

/// The on-disk YAML override document (`config.yml`).
///
/// Loaded wholesale, mutated field by field, written back wholesale. Keys the
/// plugin does not own pass through untouched, including nested values.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    doc: serde_yaml::Mapping,
}

impl ConfigDocument {
    /// Loads the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file does not exist,
    /// [`ConfigError::LoadFailed`] if it cannot be read or parsed, and
    /// [`ConfigError::InvalidFormat`] if the root is not a mapping.
    pub fn load(path: impl Into<PathBuf>) -> std::result::Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::load_failed(path.display().to_string(), e.to_string()))?;

        let doc: serde_yaml::Value = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::load_failed(path.display().to_string(), e.to_string()))?;

        let doc = match doc {
            serde_yaml::Value::Mapping(mapping) => mapping,
            // An empty file deserializes to null; treat it as an empty map.
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(ConfigError::InvalidFormat {
                    reason: format!("expected a mapping at the document root, got {:?}", other),
                });
            }
        };

        Ok(Self { path, doc })
    }

    /// Returns the path this document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the scalar value for `key`, if present.
    ///
    /// Presence is checked on the document itself, so falsy values (`false`,
    /// `0`, empty strings) are still reported.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.doc.get(key).and_then(ConfigValue::from_yaml)
    }

    /// Returns true if `key` exists in the document, scalar or not.
    pub fn contains(&self, key: &str) -> bool {
        self.doc.contains_key(key)
    }

    /// Sets `key` to `value` in the in-memory document.
    pub fn set(&mut self, key: &str, value: &ConfigValue) {
        self.doc.insert(
            serde_yaml::Value::String(key.to_string()),
            serde_yaml::Value::from(value),
        );
    }

    /// Writes the document back to its path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SaveFailed`] if serialization or the write
    /// fails.
    pub fn save(&self) -> std::result::Result<(), ConfigError> {
        let contents = serde_yaml::to_string(&self.doc)
            .map_err(|e| ConfigError::save_failed(self.path.display().to_string(), e.to_string()))?;

        std::fs::write(&self.path, contents)
            .map_err(|e| ConfigError::save_failed(self.path.display().to_string(), e.to_string()))
    }
}
