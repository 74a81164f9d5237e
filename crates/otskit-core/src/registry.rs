//! Plugin registry: registration, lifecycle fan-out, and router assembly.
//!
//! The registry owns every registered plugin. Activation failures are caught
//! here and logged so a misbehaving plugin can never take down the host
//! process; the failed plugin stays registered in a partially-initialized
//! state and its routes are still mounted.

use crate::auth::RequireAdmin;
use crate::plugin::{Plugin, PluginContext, PluginDescriptor};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

/// Shared registry handle used as axum state.
pub type SharedRegistry = Arc<RwLock<PluginRegistry>>;

/// Owns registered plugins and drives their lifecycle.
pub struct PluginRegistry {
    ctx: PluginContext,
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// Creates an empty registry over the given host context.
    pub fn new(ctx: PluginContext) -> Self {
        Self {
            ctx,
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin. Registration alone has no side effects; call
    /// [`activate_all`](Self::activate_all) to run lifecycle hooks.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        info!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
    }

    /// Returns the host context.
    pub fn context(&self) -> &PluginContext {
        &self.ctx
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Activates every registered plugin.
    ///
    /// Errors are logged and swallowed; activation never propagates a
    /// failure to the caller. Returns the number of plugins that activated
    /// cleanly.
    pub fn activate_all(&mut self) -> usize {
        let ctx = self.ctx.clone();
        let mut activated = 0;

        for plugin in &mut self.plugins {
            match plugin.activate(&ctx) {
                Ok(()) => {
                    info!(plugin = plugin.name(), "activated plugin");
                    activated += 1;
                }
                Err(e) => {
                    error!(plugin = plugin.name(), error = %e, "plugin activation failed");
                }
            }
        }

        activated
    }

    /// Wraps the registry in the shared handle used as axum state.
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Stops every registered plugin.
    pub fn stop_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.stop();
            info!(plugin = plugin.name(), "stopped plugin");
        }
    }

    /// Returns fresh descriptors for every registered plugin.
    pub fn describe_all(&self) -> Vec<PluginDescriptor> {
        self.plugins.iter().map(|p| p.describe()).collect()
    }

    /// URL prefix a plugin is mounted under. Hyphens are folded to
    /// underscores so the prefix stays a single unambiguous path segment.
    pub fn url_prefix(name: &str) -> String {
        format!("/api/plugins/{}", name.replace('-', "_"))
    }

    /// Assembles the host-side router: every plugin's routes nested under
    /// its URL prefix, plus an admin-only listing at `/api/plugins`.
    pub fn router(shared: SharedRegistry) -> Router {
        let mut router = Router::new().route(
            "/api/plugins",
            get(list_plugins).with_state(shared.clone()),
        );

        let registry = shared.read();
        for plugin in &registry.plugins {
            let prefix = Self::url_prefix(plugin.name());
            info!(plugin = plugin.name(), prefix = %prefix, "mounting plugin routes");
            router = router.nest(&prefix, plugin.router(&registry.ctx));
        }

        router
    }
}

/// GET /api/plugins - descriptors of every registered plugin.
async fn list_plugins(
    State(registry): State<SharedRegistry>,
    RequireAdmin(_user): RequireAdmin,
) -> Json<Vec<PluginDescriptor>> {
    Json(registry.read().describe_all())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::error::{PluginError, Result};
    use crate::plugin::RouteInfo;

    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlakyPlugin {
        name: &'static str,
        fail: bool,
        stopped: Arc<AtomicBool>,
    }

    impl FlakyPlugin {
        fn new(name: &'static str, fail: bool) -> Self {
            Self {
                name,
                fail,
                stopped: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl Plugin for FlakyPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn activate(&mut self, ctx: &PluginContext) -> Result<()> {
            if self.fail {
                return Err(PluginError::activation_failed(self.name, "boom"));
            }
            ctx.config.set(format!("{}_ACTIVE", self.name), true);
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }

        fn describe(&self) -> PluginDescriptor {
            PluginDescriptor {
                name: self.name.to_string(),
                package: "test".to_string(),
                version: "0.0.0".to_string(),
                description: String::new(),
                routes: vec![RouteInfo::new("/", &["GET"])],
            }
        }

        fn router(&self, _ctx: &PluginContext) -> Router {
            Router::new()
        }
    }

    fn test_ctx() -> PluginContext {
        PluginContext::new(ConfigStore::new(), std::env::temp_dir())
    }

    #[test]
    fn test_activation_failure_is_swallowed() {
        let ctx = test_ctx();
        let mut registry = PluginRegistry::new(ctx.clone());
        registry.register(Box::new(FlakyPlugin::new("bad", true)));
        registry.register(Box::new(FlakyPlugin::new("good", false)));

        let activated = registry.activate_all();
        assert_eq!(activated, 1);
        // The failed plugin stays registered alongside the healthy one.
        assert_eq!(registry.len(), 2);
        assert!(ctx.config.contains("good_ACTIVE"));
        assert!(!ctx.config.contains("bad_ACTIVE"));
    }

    #[test]
    fn test_describe_all() {
        let mut registry = PluginRegistry::new(test_ctx());
        registry.register(Box::new(FlakyPlugin::new("one", false)));

        let descriptors = registry.describe_all();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "one");
    }

    #[test]
    fn test_stop_all_reaches_every_plugin() {
        let plugin = FlakyPlugin::new("worker", false);
        let stopped = plugin.stopped.clone();

        let mut registry = PluginRegistry::new(test_ctx());
        registry.register(Box::new(plugin));
        registry.activate_all();
        registry.stop_all();

        assert!(stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_url_prefix_folds_hyphens() {
        assert_eq!(
            PluginRegistry::url_prefix("ais-stream"),
            "/api/plugins/ais_stream"
        );
        assert_eq!(PluginRegistry::url_prefix("hello"), "/api/plugins/hello");
    }

    #[test]
    fn test_router_builds_with_failed_plugin() {
        let mut registry = PluginRegistry::new(test_ctx());
        registry.register(Box::new(FlakyPlugin::new("bad", true)));
        registry.activate_all();

        let _router = PluginRegistry::router(registry.into_shared());
    }
}
