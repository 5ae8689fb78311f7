//! Qdrant REST client: exact-match scroll and single-point upsert.
//!
//! Wire shapes follow the Qdrant HTTP API:
//! - `POST /collections/{name}/points/scroll`
//! - `PUT  /collections/{name}/points?wait=true`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use casevec_core::types::Point;

use crate::store::{PointStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchValue {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub matches: MatchValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Filter {
    pub must: Vec<FieldCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrollRequest {
    pub filter: Filter,
    pub limit: usize,
}

impl ScrollRequest {
    pub fn exact_match(key: &str, value: &str, limit: usize) -> Self {
        Self {
            filter: Filter {
                must: vec![FieldCondition { key: key.to_string(), matches: MatchValue { value: value.to_string() } }],
            },
            limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    points: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    points: [&'a Point; 1],
}

pub struct QdrantClient { http: reqwest::Client, base_url: String, collection: String }

impl QdrantClient {
    pub fn new(base_url: &str, collection: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), collection: collection.to_string() })
    }

    pub fn collection(&self) -> &str { &self.collection }

    fn points_url(&self) -> String { format!("{}/collections/{}/points", self.base_url, self.collection) }

    async fn check(res: reqwest::Response) -> Result<String, StoreError> {
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() { return Err(StoreError::Status { status: status.as_u16(), body }); }
        Ok(body)
    }
}

#[async_trait]
impl PointStore for QdrantClient {
    async fn find_by_field(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let req = ScrollRequest::exact_match(key, value, 1);
        let res = self.http.post(format!("{}/scroll", self.points_url())).json(&req).send().await?;
        let body = Self::check(res).await?;
        let parsed: ScrollResponse = serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!(key, hits = parsed.result.points.len(), "scroll");
        Ok(!parsed.result.points.is_empty())
    }

    async fn upsert(&self, point: &Point) -> Result<(), StoreError> {
        let body = UpsertRequest { points: [point] };
        let res = self.http.put(format!("{}?wait=true", self.points_url())).json(&body).send().await?;
        Self::check(res).await?;
        debug!(id = %point.id, "upserted point");
        Ok(())
    }
}
