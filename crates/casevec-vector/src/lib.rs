//! Tabular rows → embedded points in a Qdrant collection.

pub mod embed_provider;
pub mod pipeline;
pub mod profile;
pub mod qdrant;
pub mod store;

pub use embed_provider::{EmbedError, EmbedProvider, LocalProvider, RemoteProvider};
pub use pipeline::{build_payload, IngestReport, Pipeline, PipelineOptions, RowOutcome, PROVENANCE_FIELD};
pub use profile::IngestProfile;
pub use qdrant::QdrantClient;
pub use store::{PointStore, StoreError};
