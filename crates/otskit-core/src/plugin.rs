//! The plugin contract between the host and loadable plugins.
//!
//! A plugin is registered explicitly with the host's
//! [`PluginRegistry`](crate::registry::PluginRegistry) and
//! receives a [`PluginContext`] by reference; it never reaches into ambient
//! globals. The host drives the lifecycle: `activate` once at startup,
//! `stop` once at shutdown, `describe` whenever metadata is requested.

use crate::config::ConfigStore;
use crate::error::Result;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Host-provided context handed to plugins at activation and route setup.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// The host's live configuration store.
    pub config: ConfigStore,
    /// Host-designated data directory holding `config.yml` and plugin state.
    pub data_dir: PathBuf,
}

impl PluginContext {
    /// Creates a context over the given store and data directory.
    pub fn new(config: ConfigStore, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            data_dir: data_dir.into(),
        }
    }

    /// Path of the YAML override document shared with the host.
    pub fn overrides_path(&self) -> PathBuf {
        self.data_dir.join("config.yml")
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// A single route exposed by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RouteInfo {
    /// Path relative to the plugin's URL prefix
    pub path: String,
    /// HTTP methods served on this path
    pub methods: Vec<String>,
}

impl RouteInfo {
    /// Creates a route entry.
    pub fn new(path: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            path: path.into(),
            methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Complete plugin information as reported by [`Plugin::describe`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PluginDescriptor {
    /// Stable plugin name; also drives the URL prefix
    pub name: String,
    /// Cargo package the plugin is distributed as
    pub package: String,
    /// Package version
    pub version: String,
    /// Package description
    pub description: String,
    /// Routes the plugin registers, relative to its prefix
    pub routes: Vec<RouteInfo>,
}

/// The lifecycle contract a loadable plugin implements.
///
/// Implementations must be `Send + Sync`; route handlers run on the host's
/// multi-threaded runtime.
pub trait Plugin: Send + Sync {
    /// Stable identifier. Used to derive the plugin's URL prefix, so it
    /// should be short and lowercase.
    fn name(&self) -> &str;

    /// Called once by the host after registration.
    ///
    /// Errors are caught and logged by the registry; returning `Err` leaves
    /// the plugin registered but partially initialized.
    fn activate(&mut self, ctx: &PluginContext) -> Result<()>;

    /// Called once at host shutdown. A plugin with background work must
    /// release it here; the default is a no-op.
    fn stop(&mut self) {}

    /// Returns the plugin's current metadata and route table. Called on
    /// demand and expected to be rebuilt per call, not cached.
    fn describe(&self) -> PluginDescriptor;

    /// Builds the plugin's router. The host mounts it under the plugin's
    /// URL prefix.
    fn router(&self, ctx: &PluginContext) -> Router;
}
