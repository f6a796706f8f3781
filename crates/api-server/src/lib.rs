//! HTTP boundary for the priority task queue service: translates the wire
//! protocol onto [`queue_core::QueueService`] and owns the process lifecycle
//! (startup, graceful shutdown, periodic snapshotting).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

pub async fn start_server() -> Result<()> {
    init_tracing();

    info!("queue service starting");

    let config = Config::load()?;
    info!(host = %config.server.host, port = config.server.port, "configuration loaded");

    let state = AppState::new(&config).await;
    info!("application state initialized");

    let app = build_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down");
    state.service.shutdown().await;
    info!("shutdown complete");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,queue_core=debug,queue_api_server=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let queue_routes = Router::new()
        .route("/", post(routes::queue::create_queue))
        .route(
            "/admin/clear",
            delete(routes::admin::clear_all),
        )
        .route(
            "/:queue_id/task",
            post(routes::task::enqueue_task).get(routes::task::dequeue_task),
        )
        .route("/:queue_id/result", post(routes::result::submit_result))
        .route("/:queue_id/result/:task_id", get(routes::result::get_result))
        .route("/:queue_id/status", get(routes::status::queue_status));

    Router::new()
        .route("/healthz", get(routes::health::healthz))
        .nest("/queue", queue_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(
                    CorsLayer::new()
                        .allow_origin("*".parse::<HeaderValue>().unwrap())
                        .allow_methods([Method::GET, Method::POST, Method::DELETE]),
                ),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received ctrl-c"),
        _ = terminate => warn!("received sigterm"),
    }

    info!("starting graceful shutdown");
}
