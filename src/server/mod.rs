//! HTTP surface for the conversion service.

pub mod routes;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::ConversionService;
use crate::core::config::ServerConfig;

pub fn create_router(service: Arc<ConversionService>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/convert-currency", get(routes::convert_currency))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

pub async fn serve(config: &ServerConfig, service: Arc<ConversionService>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Currency API listening");
    axum::serve(listener, create_router(service, &config.static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
