//! OTSKit plugin host contract.
//!
//! This crate defines the interface between a TAK server host and its
//! loadable plugins: the [`Plugin`] lifecycle trait, the [`PluginContext`]
//! handed to plugins at activation, the live [`ConfigStore`] shared with the
//! host, the on-disk YAML override document, and the role gate plugin routes
//! sit behind.
//!
//! # Example
//!
//! ```no_run
//! use otskit_core::{ConfigStore, PluginContext, PluginRegistry};
//!
//! let store = ConfigStore::new();
//! let ctx = PluginContext::new(store, "/var/lib/ots");
//!
//! let mut registry = PluginRegistry::new(ctx);
//! // registry.register(Box::new(MyPlugin::default()));
//! registry.activate_all();
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod plugin;
pub mod registry;

pub use auth::{AuthError, CurrentUser, RequireAdmin, ROLE_ADMINISTRATOR};
pub use config::{ConfigDocument, ConfigStore, ConfigValue};
pub use error::{ConfigError, PluginError, Result};
pub use plugin::{Plugin, PluginContext, PluginDescriptor, RouteInfo};
pub use registry::{PluginRegistry, SharedRegistry};

/// Plugin API version. Hosts and plugins built against different major
/// versions of this contract must not be mixed.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version() {
        assert_eq!(PLUGIN_API_VERSION, "0.1.0");
    }
}
