use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the embedding endpoint.
///
/// Body rejections keep the status axum assigns them: 400 for malformed JSON,
/// 415 for a missing JSON content type, 422 when `text` is absent or not a string.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Rejected(#[from] JsonRejection),
    #[error("embedding failed: {0}")]
    Embedding(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected(r) => r.status(),
            ApiError::Embedding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_error_is_internal() {
        let e = ApiError::Embedding("tokenizer blew up".into());
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "embedding failed: tokenizer blew up");
    }
}
