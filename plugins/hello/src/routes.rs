//! HTTP routes for the hello plugin.
//!
//! The host mounts this router under the plugin's URL prefix
//! (`/api/plugins/hello`). Every route requires the administrator role;
//! failures are caught at the route boundary and converted to structured
//! JSON so nothing can escape into the host process.

use crate::default_config;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use otskit_core::{ConfigError, ConfigValue, PluginContext, PluginDescriptor, RequireAdmin, RouteInfo};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};
use utoipa::{OpenApi, ToSchema};

// ============================================================================
// State & Embedded Assets
// ============================================================================

#[derive(Clone)]
pub struct HelloState {
    pub ctx: PluginContext,
}

/// The plugin's web UI, compiled into the binary so deployment stays a
/// single artifact.
#[derive(RustEmbed)]
#[folder = "ui/"]
struct UiAssets;

// ============================================================================
// Response Types
// ============================================================================

/// Outcome payload for config updates and error responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl StatusPayload {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: String::new(),
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ============================================================================
// Router Setup
// ============================================================================

pub fn router(ctx: PluginContext) -> Router {
    Router::new()
        .route("/", get(plugin_info))
        .route("/ui", get(ui))
        .route("/assets/{*file}", get(serve_asset))
        .route("/config", get(get_config).post(update_config))
        .with_state(HelloState { ctx })
}

/// The route table reported by `describe`, relative to the plugin prefix.
pub fn route_table() -> Vec<RouteInfo> {
    vec![
        RouteInfo::new("/", &["GET"]),
        RouteInfo::new("/ui", &["GET"]),
        RouteInfo::new("/assets/{*file}", &["GET"]),
        RouteInfo::new("/config", &["GET", "POST"]),
    ]
}

/// OpenAPI document for the plugin's routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OTS Hello Plugin",
        description = "Template plugin HTTP surface"
    ),
    paths(plugin_info, ui, serve_asset, get_config, update_config),
    components(schemas(StatusPayload, PluginDescriptor, RouteInfo))
)]
pub struct HelloApiDoc;

// ============================================================================
// Endpoints
// ============================================================================

/// GET / - plugin metadata
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Plugin metadata", body = PluginDescriptor),
        (status = 401, description = "Not authenticated", body = StatusPayload),
        (status = 403, description = "Administrator role required", body = StatusPayload)
    )
)]
async fn plugin_info(RequireAdmin(_user): RequireAdmin) -> Json<PluginDescriptor> {
    Json(crate::descriptor())
}

/// GET /ui - embedded web UI entry point
#[utoipa::path(
    get,
    path = "/ui",
    responses(
        (status = 200, description = "UI entry point"),
        (status = 404, description = "UI not bundled")
    )
)]
async fn ui(RequireAdmin(_user): RequireAdmin) -> Response {
    match UiAssets::get("index.html") {
        Some(content) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content.data.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /assets/{file} - embedded static assets
#[utoipa::path(
    get,
    path = "/assets/{file}",
    params(("file" = String, Path, description = "Asset path relative to the assets directory")),
    responses(
        (status = 200, description = "Asset contents"),
        (status = 404, description = "No such asset")
    )
)]
async fn serve_asset(
    RequireAdmin(_user): RequireAdmin,
    Path(file): Path<String>,
) -> Response {
    let path = format!("assets/{}", file);
    debug!(path = %path, "serving plugin asset");

    match UiAssets::get(&path) {
        Some(content) => (
            [(header::CONTENT_TYPE, mime_type_for_path(&path))],
            content.data.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /config - current config keys/values
#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Current configuration as a flat key/value map"),
        (status = 401, description = "Not authenticated", body = StatusPayload),
        (status = 403, description = "Administrator role required", body = StatusPayload)
    )
)]
async fn get_config(
    State(state): State<HelloState>,
    RequireAdmin(_user): RequireAdmin,
) -> Json<BTreeMap<String, ConfigValue>> {
    // Report every key the plugin declares, reading live values and falling
    // back to the compiled-in default for anything the host has not set.
    let config = default_config::defaults()
        .into_iter()
        .map(|(key, default)| {
            let value = state.ctx.config.get(&key).unwrap_or(default);
            (key, value)
        })
        .collect();

    Json(config)
}

/// POST /config - validate and persist config settings
#[utoipa::path(
    post,
    path = "/config",
    responses(
        (status = 200, description = "Settings applied", body = StatusPayload),
        (status = 400, description = "Rejected settings", body = StatusPayload),
        (status = 500, description = "Failed to persist settings", body = StatusPayload)
    )
)]
async fn update_config(
    State(state): State<HelloState>,
    RequireAdmin(_user): RequireAdmin,
    Json(proposed): Json<serde_json::Map<String, serde_json::Value>>,
) -> Response {
    let mut settings = BTreeMap::new();
    for (key, value) in &proposed {
        match ConfigValue::from_json(value) {
            Some(value) => {
                settings.insert(key.clone(), value);
            }
            None => {
                return reject(
                    StatusCode::BAD_REQUEST,
                    format!("{} must be a scalar value", key),
                );
            }
        }
    }

    match default_config::update_config(&state.ctx, &settings) {
        Ok(()) => Json(StatusPayload::ok()).into_response(),
        Err(e) => {
            error!(error = %e, "failed to update config");
            reject(status_for(&e), e.to_string())
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn reject(status: StatusCode, error: String) -> Response {
    (status, Json(StatusPayload::err(error))).into_response()
}

/// Validation failures are the caller's fault; everything else is an I/O or
/// format problem on our side.
fn status_for(err: &ConfigError) -> StatusCode {
    if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn mime_type_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
