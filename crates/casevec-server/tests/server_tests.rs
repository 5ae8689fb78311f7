use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use casevec_core::traits::Embedder;
use casevec_embed::FakeEmbedder;
use casevec_server::{router, AppState};

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn dim(&self) -> usize { 8 }
    fn max_len(&self) -> usize { 128 }
    fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> { anyhow::bail!("forward pass failed") }
}

fn app(embedder: Arc<dyn Embedder>) -> axum::Router { router(AppState::new(embedder)) }

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/embed")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn embed_returns_vector_of_model_dim() {
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(post_json(r#"{"text":"피싱 본문 텍스트"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["vector"].as_array().map(Vec::len), Some(16));
}

#[tokio::test]
async fn same_text_twice_gives_same_vector() {
    let app = app(Arc::new(FakeEmbedder::new(16)));
    let a = json_body(app.clone().oneshot(post_json(r#"{"text":"택배 문자"}"#)).await.unwrap()).await;
    let b = json_body(app.oneshot(post_json(r#"{"text":"택배 문자"}"#)).await.unwrap()).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn empty_text_is_embedded() {
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(post_json(r#"{"text":""}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["vector"].as_array().map(Vec::len), Some(16));
}

#[tokio::test]
async fn missing_text_is_unprocessable() {
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(post_json(r#"{"content":"x"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn non_string_text_is_unprocessable() {
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(post_json(r#"{"text":42}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(post_json("{not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/embed")
        .body(Body::from(r#"{"text":"x"}"#))
        .unwrap();
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn model_failure_is_internal_error() {
    let resp = app(Arc::new(FailingEmbedder)).oneshot(post_json(r#"{"text":"x"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("forward pass failed"));
}

#[tokio::test]
async fn health_reports_dim() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app(Arc::new(FakeEmbedder::new(24))).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dim"], 24);
}

#[tokio::test]
async fn get_on_embed_is_not_allowed() {
    let req = Request::builder().uri("/v1/embed").body(Body::empty()).unwrap();
    let resp = app(Arc::new(FakeEmbedder::new(16))).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
