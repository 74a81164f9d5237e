//! OTSKit demo host.
//!
//! Plugins cannot run standalone; they are mounted into a host that owns
//! routing, authentication, and the live config store. This binary is the
//! smallest host that exercises the whole contract: it seeds a data
//! directory, registers the hello plugin, grants the administrator role to
//! requests carrying the admin bearer token, and serves the plugin routes.

use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Json;
use chrono::{Duration, Utc};
use clap::Parser;
use ots_hello_plugin::{HelloApiDoc, HelloPlugin};
use otskit_core::{ConfigStore, CurrentUser, PluginContext, PluginRegistry};
use otskit_cot::{serialize_event, CotEvent, Point};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use utoipa::OpenApi;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "otskit-demo", about = "Demo host that mounts the hello plugin")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Data directory holding config.yml
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Bearer token granting the administrator role
    #[arg(long, env = "OTSKIT_ADMIN_TOKEN")]
    admin_token: Option<String>,
}

#[derive(Clone)]
struct AdminToken(String);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let admin_token = args.admin_token.unwrap_or_else(|| {
        let token = Uuid::new_v4().to_string();
        info!(token = %token, "generated admin token");
        token
    });

    seed_data_dir(&args.data_dir)?;

    // Host context shared with every plugin.
    let config = ConfigStore::new();
    let ctx = PluginContext::new(config, &args.data_dir);

    let mut registry = PluginRegistry::new(ctx);
    registry.register(Box::new(HelloPlugin::default()));
    registry.activate_all();
    let registry = registry.into_shared();

    log_sample_event();

    let openapi = HelloApiDoc::openapi();
    let app = PluginRegistry::router(registry.clone())
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(|| async move { Json(openapi) }),
        )
        .layer(axum::middleware::from_fn_with_state(
            AdminToken(admin_token),
            admin_auth,
        ))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(address = %listener.local_addr()?, "demo host listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.write().stop_all();
    info!("demo host stopped");
    Ok(())
}

/// Creates the data directory and an empty override document when absent,
/// so first runs activate cleanly.
fn seed_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

    let overrides = data_dir.join("config.yml");
    if !overrides.exists() {
        std::fs::write(&overrides, "{}\n")
            .with_context(|| format!("failed to seed {}", overrides.display()))?;
        info!(path = %overrides.display(), "seeded empty config.yml");
    }

    Ok(())
}

/// Grants the administrator role to requests carrying the admin bearer
/// token. Stands in for the real host's role-based access control.
async fn admin_auth(
    State(AdminToken(token)): State<AdminToken>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {}", token));

    if authorized {
        request
            .extensions_mut()
            .insert(CurrentUser::administrator("admin"));
    }

    next.run(request).await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
    }))
}

/// Builds and logs one CoT event so a new deployment shows the wire format
/// end to end.
fn log_sample_event() {
    let now = Utc::now();
    let mut event = CotEvent::new(
        now,
        now + Duration::minutes(5),
        format!("otskit-demo-{}", Uuid::new_v4()),
    );
    event.set_point(Point::new(50.8466, 4.3528));
    event.add_detail("remarks", vec![], Some("demo host online".to_string()));

    debug!(cot = %serialize_event(&event), "sample CoT event");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl-C signal");
        },
        _ = terminate => {
            info!("received terminate signal");
        },
    }
}
