use async_trait::async_trait;
use std::time::Duration;

use casevec_core::types::{EmbedRequest, EmbedResponse};

use super::{EmbedError, EmbedProvider};

pub struct RemoteProvider {
    http: reqwest::Client,
    url: String,
    id: String,
}

impl RemoteProvider {
    /// `url` is the full endpoint, e.g. `http://localhost:8000/v1/embed`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, EmbedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url: url.to_string(), id: format!("remote:{url}") })
    }
}

#[async_trait]
impl EmbedProvider for RemoteProvider {
    fn provider_id(&self) -> &str { &self.id }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let req = EmbedRequest { text: text.to_string() };
        let res = self.http.post(&self.url).json(&req).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(EmbedError::Status { status: status.as_u16(), body });
        }
        let parsed: EmbedResponse = serde_json::from_str(&body).map_err(|e| EmbedError::Decode(e.to_string()))?;
        if parsed.vector.is_empty() { return Err(EmbedError::Decode("empty vector".to_string())); }
        Ok(parsed.vector)
    }
}
