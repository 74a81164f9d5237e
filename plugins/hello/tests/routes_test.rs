//! Integration tests for the hello plugin HTTP surface.
//!
//! Drives the plugin router the way the host would: an authenticated
//! administrator hits metadata, UI, asset, and config endpoints. The host's
//! auth middleware is stood in for by an `Extension` layer carrying the
//! current user.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::{Extension, Router};
use http_body_util::BodyExt;
use ots_hello_plugin::{default_config, HelloPlugin};
use otskit_core::{
    ConfigDocument, ConfigStore, ConfigValue, CurrentUser, Plugin, PluginContext, PluginRegistry,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Test Setup Helpers
// ============================================================================

/// Creates a data directory with the given config.yml contents.
fn temp_data_dir(yaml: Option<&str>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ots-hello-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp data dir");
    if let Some(yaml) = yaml {
        std::fs::write(dir.join("config.yml"), yaml).expect("write config.yml");
    }
    dir
}

/// Activates the plugin and returns its router plus the context.
fn activated_router(yaml: Option<&str>, user: Option<CurrentUser>) -> (Router, PluginContext) {
    let ctx = PluginContext::new(ConfigStore::new(), temp_data_dir(yaml));

    let mut plugin = HelloPlugin::default();
    // Activation failures are tolerated, mirroring the registry's behavior.
    let _ = plugin.activate(&ctx);

    let mut router = plugin.router(&ctx);
    if let Some(user) = user {
        router = router.layer(Extension(user));
    }
    (router, ctx)
}

fn admin() -> CurrentUser {
    CurrentUser::administrator("admin")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

// ============================================================================
// Metadata & UI
// ============================================================================

#[tokio::test]
async fn test_plugin_info() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info = body_json(response).await;
    assert_eq!(info["name"], "hello");
    assert_eq!(info["package"], "ots-hello-plugin");
    assert!(info["routes"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn test_ui_entry_point() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app.oneshot(get("/ui")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_asset_served_and_missing_asset_404() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app.clone().oneshot(get("/assets/app.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );

    let response = app.oneshot(get("/assets/missing.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Role Gate
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let (app, _ctx) = activated_router(Some("{}\n"), None);

    let response = app.oneshot(get("/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let user = CurrentUser::new("viewer", &["user"]);
    let (app, _ctx) = activated_router(Some("{}\n"), Some(user));

    let response = app.oneshot(get("/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Config Endpoints
// ============================================================================

#[tokio::test]
async fn test_get_config_returns_defaults() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app.oneshot(get("/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let config = body_json(response).await;
    assert_eq!(config["OTS_HELLOPLUGIN_ENABLED"], true);
    assert_eq!(config["OTS_HELLOPLUGIN_SOME_SETTING"], "my_setting_value");
}

#[tokio::test]
async fn test_get_config_reflects_overrides() {
    let (app, _ctx) = activated_router(
        Some("OTS_HELLOPLUGIN_SOME_SETTING: overridden\n"),
        Some(admin()),
    );

    let response = app.oneshot(get("/config")).await.unwrap();
    let config = body_json(response).await;
    assert_eq!(config["OTS_HELLOPLUGIN_SOME_SETTING"], "overridden");
}

#[tokio::test]
async fn test_falsy_override_is_applied() {
    let (app, _ctx) = activated_router(Some("OTS_HELLOPLUGIN_ENABLED: false\n"), Some(admin()));

    let response = app.oneshot(get("/config")).await.unwrap();
    let config = body_json(response).await;
    assert_eq!(config["OTS_HELLOPLUGIN_ENABLED"], false);
}

#[tokio::test]
async fn test_update_config_round_trip() {
    let (app, ctx) = activated_router(Some("OTS_LISTENER_PORT: 8089\n"), Some(admin()));

    let response = app
        .oneshot(post_json(
            "/config",
            &json!({"OTS_HELLOPLUGIN_SOME_SETTING": "abc"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    // Live store sees the update.
    assert_eq!(
        ctx.config.get(default_config::SOME_SETTING),
        Some(ConfigValue::from("abc"))
    );

    // The document sees the update and host-owned keys survive.
    let doc = ConfigDocument::load(ctx.overrides_path()).unwrap();
    assert_eq!(
        doc.get(default_config::SOME_SETTING),
        Some(ConfigValue::from("abc"))
    );
    assert_eq!(doc.get("OTS_LISTENER_PORT"), Some(ConfigValue::Int(8089)));
}

#[tokio::test]
async fn test_update_config_unknown_key() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app
        .oneshot(post_json("/config", &json!({"UNKNOWN_KEY": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"success": false, "error": "UNKNOWN_KEY is not a valid config key"})
    );
}

#[tokio::test]
async fn test_update_config_wrong_type() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app
        .oneshot(post_json(
            "/config",
            &json!({"OTS_HELLOPLUGIN_ENABLED": "yes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "OTS_HELLOPLUGIN_ENABLED should be a boolean");
}

#[tokio::test]
async fn test_update_config_rejects_non_scalar_value() {
    let (app, _ctx) = activated_router(Some("{}\n"), Some(admin()));

    let response = app
        .oneshot(post_json(
            "/config",
            &json!({"OTS_HELLOPLUGIN_SOME_SETTING": {"nested": true}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_config_missing_document_is_500() {
    // No config.yml in the data dir: activation already logged the failure,
    // and an update reports it instead of panicking.
    let (app, _ctx) = activated_router(None, Some(admin()));

    let response = app
        .oneshot(post_json(
            "/config",
            &json!({"OTS_HELLOPLUGIN_SOME_SETTING": "abc"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

// ============================================================================
// Registry Mounting
// ============================================================================

#[tokio::test]
async fn test_registry_mounts_plugin_under_prefix() {
    let ctx = PluginContext::new(ConfigStore::new(), temp_data_dir(Some("{}\n")));
    let mut registry = PluginRegistry::new(ctx);
    registry.register(Box::new(HelloPlugin::default()));
    registry.activate_all();

    let app = PluginRegistry::router(registry.into_shared()).layer(Extension(admin()));

    let response = app
        .clone()
        .oneshot(get("/api/plugins/hello/config"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The listing endpoint reports the mounted plugin.
    let response = app.oneshot(get("/api/plugins")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing[0]["name"], "hello");
}
