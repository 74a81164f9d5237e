//! Hello-world template plugin for OTSKit hosts.
//!
//! Copy this package to start a new plugin:
//!
//! 1. Rename the package and the config key prefix in
//!    [`default_config`] — keys are upper-case and carry the plugin name so
//!    they can never collide with the host's settings.
//! 2. Replace the embedded UI under `ui/` with your own entry point and
//!    assets.
//! 3. Add routes in [`routes`] and keep [`routes::route_table`] in sync.
//! 4. Spawn background work in [`Plugin::activate`] and release it in
//!    [`Plugin::stop`].
//!
//! Outgoing CoT messages are built with `otskit-cot`:
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use otskit_cot::{serialize_event, CotEvent, Point};
//!
//! let now = Utc::now();
//! let mut event = CotEvent::new(now, now + Duration::minutes(2), "hello-1");
//! event.set_point(Point::new(50.8503, 4.3517));
//! let xml = serialize_event(&event);
//! # assert!(xml.contains("hello-1"));
//! ```

pub mod default_config;
pub mod routes;

use otskit_core::{Plugin, PluginContext, PluginDescriptor, Result};
use tracing::info;

pub use routes::HelloApiDoc;

/// Stable plugin name; drives the URL prefix the host mounts us under.
pub const PLUGIN_NAME: &str = "hello";

/// Returns the plugin's current metadata and route table.
///
/// Package metadata is resolved at compile time from Cargo, so unlike a
/// dynamically discovered plugin this can never fail at runtime.
pub fn descriptor() -> PluginDescriptor {
    PluginDescriptor {
        name: PLUGIN_NAME.to_string(),
        package: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: env!("CARGO_PKG_DESCRIPTION").to_string(),
        routes: routes::route_table(),
    }
}

/// The template plugin.
#[derive(Debug, Default)]
pub struct HelloPlugin;

impl Plugin for HelloPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    /// Seeds compiled-in defaults into the host's live store, then applies
    /// user overrides from `config.yml`.
    ///
    /// If the override document is missing or unreadable the error reaches
    /// the registry, which logs and swallows it; the defaults stay seeded.
    fn activate(&mut self, ctx: &PluginContext) -> Result<()> {
        default_config::seed_defaults(&ctx.config);
        default_config::apply_overrides(ctx)?;

        info!(plugin = PLUGIN_NAME, "loaded configuration");
        Ok(())
    }

    fn stop(&mut self) {
        // Nothing to release; a plugin with background work joins it here.
    }

    fn describe(&self) -> PluginDescriptor {
        descriptor()
    }

    fn router(&self, ctx: &PluginContext) -> axum::Router {
        routes::router(ctx.clone())
    }
}
