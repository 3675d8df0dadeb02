//! Server initialization and routing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use refind::RefindConfig;

use crate::config::ServerConfig;
use crate::routes::{api_info, health, items, not_found};
use crate::state::ServerState;

/// Build the Axum router with all routes and middleware.
fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    let trigger_routes = Router::new()
        .route("/v1/items", post(items::create_item))
        .route("/v1/items/{kind}/{id}/recheck", post(items::recheck_item));

    Router::new()
        .merge(public_routes)
        .merge(trigger_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.timeout_secs),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the refind HTTP server.
///
/// Initializes structured JSON logging, builds shared state from the
/// server and pipeline configurations, and serves until SIGTERM or
/// Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    let pipeline = match config.pipeline_config.as_deref() {
        Some(path) => RefindConfig::from_file(path)?,
        None => RefindConfig::default(),
    };

    let state = Arc::new(
        ServerState::new(config.clone(), pipeline)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?,
    );
    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;
    tracing::info!("Starting refind server on {}", addr);
    tracing::info!("Timeout: {}s, CORS: {}", config.timeout_secs, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
