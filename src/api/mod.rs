//! HTTP front end
//!
//! Thin request adapter over the metric tree, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /search?query=<pattern>` - glob search, one name per line
//! - `GET|POST /add?name=<metric>` - index a metric
//! - `GET /dump` - full dump of the tree
//! - `GET /stats` - request counters, RPS, metric count, queue size
//! - `GET /debug/stack` - runtime backtrace
//!
//! # Example
//!
//! ```rust,no_run
//! use metricsearch::api::{serve, AppState};
//! use metricsearch::config::Config;
//! use metricsearch::index::MetricTree;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let tree = Arc::new(MetricTree::new("/var/lib/metricsearch/index", 1000, true)?);
//!     let state = Arc::new(AppState::new(tree, &config.main));
//!     serve(state, &config.listen_addr()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;
pub mod stats;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use stats::RequestStats;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(routes::search))
        .route("/add", get(routes::add).post(routes::add))
        .route("/dump", get(routes::dump))
        .route("/stats", get(routes::stats))
        .route("/debug/stack", get(routes::debug_stack))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and the background stats job.
pub async fn serve(state: Arc<AppState>, addr: &str) -> ApiResult<()> {
    tracing::info!("starting background stats job");
    let stats_job = stats::spawn_rps_recalc(Arc::clone(&state));

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("metricsearch listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

    stats_job.abort();
    tracing::info!("server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}
