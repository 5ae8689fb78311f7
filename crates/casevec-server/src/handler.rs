//! `POST /v1/embed` and `GET /health`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use casevec_core::types::{EmbedRequest, EmbedResponse};

use crate::error::ApiError;
use crate::AppState;

/// Embed one text with the shared model.
///
/// The forward pass is CPU-bound, so it runs on the blocking pool. Empty text
/// is accepted and embedded like any other input.
pub async fn embed_handler(
    State(state): State<AppState>,
    body: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = body?;
    let embedder = Arc::clone(&state.embedder);
    let chars = request.text.chars().count();
    let started = Instant::now();

    let vector = tokio::task::spawn_blocking(move || embedder.embed(&request.text))
        .await
        .map_err(|e| ApiError::Embedding(e.to_string()))?
        .map_err(|e| {
            error!(chars, error = %e, "embedding failed");
            ApiError::Embedding(e.to_string())
        })?;

    debug!(chars, dim = vector.len(), elapsed_ms = started.elapsed().as_millis() as u64, "embedded");
    Ok(Json(EmbedResponse { vector }))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub dim: usize,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string(), dim: state.embedder.dim() })
}
