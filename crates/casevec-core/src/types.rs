//! Domain types shared by the embedding service and the ingestion pipeline.

use serde::{Deserialize, Serialize};

pub type Payload = serde_json::Map<String, serde_json::Value>;

/// One row of a tabular source file.
///
/// Cells keep the file's column order. An empty cell is stored as `None`
/// and treated as missing everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Option<String>)>) -> Self { Self { fields } }

    /// Build a record from `(column, value)` pairs; empty values become missing.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| {
                let v: String = v.into();
                (k.into(), if v.is_empty() { None } else { Some(v) })
            })
            .collect();
        Self { fields }
    }

    /// Value of a present, non-missing cell.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

/// Request body of `POST /v1/embed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedRequest {
    pub text: String,
}

/// Response body of `POST /v1/embed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    pub vector: Vec<f32>,
}

/// A destination point as written to the vector store.
///
/// - `id`: freshly generated UUID string, never reused
/// - `vector`: embedding of the row's text payload
/// - `payload`: renamed source columns plus the raw text and provenance tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: Payload,
}
