use async_trait::async_trait;
use thiserror::Error;

use casevec_core::types::Point;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected store response: {0}")]
    Decode(String),
}

/// The two vector-store operations ingestion needs.
#[async_trait]
pub trait PointStore: Send + Sync {
    /// True when at least one stored point has `payload[key] == value` exactly.
    async fn find_by_field(&self, key: &str, value: &str) -> Result<bool, StoreError>;
    /// Write one point and wait until the store has applied it.
    async fn upsert(&self, point: &Point) -> Result<(), StoreError>;
}
