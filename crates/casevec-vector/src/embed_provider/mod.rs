//! Embedding provider abstraction used by the ingestion pipeline.
//!
//! `remote` calls the `/v1/embed` service over HTTP; `local` runs an
//! in-process model. Both must return vectors of the same dimensionality for
//! a given `provider_id`.

use async_trait::async_trait;
use thiserror::Error;

pub mod local;
pub mod remote;

pub use local::LocalProvider;
pub use remote::RemoteProvider;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embedding service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected embedding response: {0}")]
    Decode(String),

    #[error("model error: {0}")]
    Model(String),
}

#[async_trait]
pub trait EmbedProvider: Send + Sync {
    /// Stable identifier for the provider (e.g. `remote:http://...`).
    fn provider_id(&self) -> &str;
    /// Compute the embedding of one text payload.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}
