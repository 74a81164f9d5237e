//! Plugin configuration: compiled-in defaults, validation, persistence.
//!
//! Config options are flat upper-case keys prefixed with the plugin name so
//! they can never collide with the host's own settings. Defaults are fixed
//! at build time; user overrides live in the host's `config.yml` and win
//! whenever the key is present in the document, falsy values included.

use otskit_core::{ConfigDocument, ConfigError, ConfigStore, ConfigValue, PluginContext};
use std::collections::BTreeMap;
use tracing::warn;

/// Master enable switch for the plugin.
pub const ENABLED: &str = "OTS_HELLOPLUGIN_ENABLED";

/// Example setting; rename it along with the plugin.
pub const SOME_SETTING: &str = "OTS_HELLOPLUGIN_SOME_SETTING";

/// The plugin's compiled-in defaults.
///
/// Every key a plugin accepts must appear here; the map doubles as the
/// allow-list for [`validate`] and declares each key's value type.
pub fn defaults() -> BTreeMap<String, ConfigValue> {
    BTreeMap::from([
        (ENABLED.to_string(), ConfigValue::from(true)),
        (
            SOME_SETTING.to_string(),
            ConfigValue::from("my_setting_value"),
        ),
    ])
}

/// Seeds the defaults into the host's live store.
pub fn seed_defaults(store: &ConfigStore) {
    store.extend(defaults());
}

/// Applies user overrides from `config.yml` on top of the defaults.
///
/// A key is applied when it is present in the document, even if its value
/// is falsy (`false`, `0`, `""`). Keys with non-scalar values are skipped
/// with a warning.
pub fn apply_overrides(ctx: &PluginContext) -> Result<(), ConfigError> {
    let doc = ConfigDocument::load(ctx.overrides_path())?;

    for key in defaults().keys() {
        if !doc.contains(key) {
            continue;
        }
        match doc.get(key) {
            Some(value) => ctx.config.set(key.clone(), value),
            None => warn!(key = %key, "ignoring non-scalar config override"),
        }
    }

    Ok(())
}

/// Validates proposed settings against the allow-list and declared types.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKey`] for keys outside the defaults and
/// [`ConfigError::TypeMismatch`] when a value's type does not match the
/// default value's type.
pub fn validate(proposed: &BTreeMap<String, ConfigValue>) -> Result<(), ConfigError> {
    let declared = defaults();

    for (key, value) in proposed {
        let default = declared
            .get(key)
            .ok_or_else(|| ConfigError::unknown_key(key.clone()))?;

        if !default.accepts(value) {
            return Err(ConfigError::type_mismatch(key.clone(), default.type_name()));
        }
    }

    Ok(())
}

/// Writes validated settings to `config.yml` and mirrors them into the
/// host's live store.
///
/// The document is rewritten wholesale; settings the plugin does not own
/// pass through untouched. The read-modify-write is not atomic, so two
/// overlapping updates race and the last write wins.
pub fn save_settings(
    ctx: &PluginContext,
    settings: &BTreeMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let mut doc = ConfigDocument::load(ctx.overrides_path())?;

    for (key, value) in settings {
        doc.set(key, value);
        ctx.config.set(key.clone(), value.clone());
    }

    doc.save()
}

/// Validates and persists user-supplied settings.
///
/// The single entry point for the config update endpoint; every failure
/// comes back as a [`ConfigError`], nothing panics past this boundary.
pub fn update_config(
    ctx: &PluginContext,
    settings: &BTreeMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    validate(settings)?;
    save_settings(ctx, settings)
}
