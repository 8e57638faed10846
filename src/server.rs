//! # HTTP Server Module
//!
//! The bot's small web surface: `GET /` answers `hi`, every other path is
//! looked up in the static asset directory.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

async fn index() -> &'static str {
    "hi"
}

/// Build the router with the index route, static assets, CORS and request logging
pub fn create_app(static_dir: &Path) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(index))
        .fallback_service(ServeDir::new(static_dir))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}

/// Bind the HTTP listener. Bind failures surface at startup.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener to {}", addr))
}

/// Serve `app` on `listener` until the task is dropped or the server fails
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr().context("HTTP listener has no local address")?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("HTTP server failed")
}
