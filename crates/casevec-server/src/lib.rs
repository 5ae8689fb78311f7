//! HTTP embedding service: one shared model behind `POST /v1/embed`.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod error;
pub mod handler;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use casevec_core::traits::Embedder;

pub use error::ApiError;
pub use handler::HealthResponse;

/// Shared state handed to every handler. The model is loaded once at startup
/// and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self { Self { embedder } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/embed", post(handler::embed_handler))
        .route("/health", get(handler::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(addr = %listener.local_addr()?, dim = state.embedder.dim(), "embedding service listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("embedding service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
