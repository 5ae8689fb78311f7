//! In-process embedding provider backed by `casevec-embed`.
//!
//! Respects `APP_USE_FAKE_EMBEDDINGS=1` through `get_default_embedder`, which
//! makes ingestion runnable without a model checkpoint or a running server.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use casevec_core::config::ServerSettings;
use casevec_core::traits::Embedder;
use casevec_embed::get_default_embedder;

use super::{EmbedError, EmbedProvider};

pub struct LocalProvider {
    inner: Arc<dyn Embedder>,
    id: String,
}

impl LocalProvider {
    /// Load the default embedder described by `settings`.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self> {
        Ok(Self::new(Arc::from(get_default_embedder(settings)?)))
    }

    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        let id = format!("local:d{}", inner.dim());
        Self { inner, id }
    }
}

#[async_trait]
impl EmbedProvider for LocalProvider {
    fn provider_id(&self) -> &str { &self.id }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || inner.embed(&text))
            .await
            .map_err(|e| EmbedError::Model(e.to_string()))?
            .map_err(|e| EmbedError::Model(e.to_string()))
    }
}
