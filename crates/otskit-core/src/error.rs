//! Error types for the OTSKit plugin host contract.
//!
//! Plugin and configuration failures are kept in separate enums so route
//! handlers can map them to HTTP statuses without string matching.

use thiserror::Error;

/// Result type alias using [`PluginError`] as the error type.
pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors raised by plugin lifecycle operations.
///
/// The registry catches these at the activation boundary; they never
/// propagate into the host process.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin failed while activating
    #[error("Failed to activate plugin '{name}': {reason}")]
    ActivationFailed { name: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A plugin name collides with an already registered plugin
    #[error("Duplicate plugin name: {name}")]
    DuplicateName { name: String },

    /// Internal errors that shouldn't normally occur
    #[error("Internal plugin error: {0}")]
    Internal(String),
}

impl PluginError {
    /// Creates an activation failed error.
    pub fn activation_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActivationFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to plugin configuration.
///
/// Covers both the on-disk YAML override document and validation of
/// user-supplied settings. Validation variants render the exact messages
/// surfaced to the web UI.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Override document not found in the data directory
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to read or parse the override document
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Failed to write the override document back to disk
    #[error("Failed to save configuration to {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    /// The document parsed but is not a flat key/value mapping
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// A proposed setting is not in the plugin's allow-list
    #[error("{key} is not a valid config key")]
    UnknownKey { key: String },

    /// A proposed value does not match the declared type of its key
    #[error("{key} should be a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a load failed error.
    pub fn load_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a save failed error.
    pub fn save_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown key error.
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
        }
    }

    /// Returns true if the error is a rejection of user input rather than
    /// an I/O or format failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConfigError::UnknownKey { .. } | ConfigError::TypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_message() {
        let err = ConfigError::unknown_key("UNKNOWN_KEY");
        assert_eq!(err.to_string(), "UNKNOWN_KEY is not a valid config key");
        assert!(err.is_validation());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ConfigError::type_mismatch("OTS_HELLOPLUGIN_SOME_SETTING", "string");
        assert_eq!(
            err.to_string(),
            "OTS_HELLOPLUGIN_SOME_SETTING should be a string"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_io_errors_are_not_validation() {
        let err = ConfigError::load_failed("/data/config.yml", "permission denied");
        assert!(!err.is_validation());

        let err = ConfigError::file_not_found("/data/config.yml");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_activation_failed_display() {
        let err = PluginError::activation_failed("hello", "config.yml missing");
        let display = err.to_string();
        assert!(display.contains("hello"));
        assert!(display.contains("config.yml missing"));
    }
}
