use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casevec_core::types::{Payload, Point};
use casevec_vector::{EmbedError, EmbedProvider, PointStore, QdrantClient, RemoteProvider, StoreError};

fn timeout() -> Duration { Duration::from_secs(5) }

#[tokio::test]
async fn find_by_field_reports_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/cases/points/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"points": [{"id": 1, "payload": {}}]}})))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), "cases", timeout()).unwrap();
    assert!(client.find_by_field("CONTENT", "본문").await.unwrap());
}

#[tokio::test]
async fn find_by_field_empty_result_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/cases/points/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"points": []}})))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), "cases", timeout()).unwrap();
    assert!(!client.find_by_field("CONTENT", "본문").await.unwrap());
}

#[tokio::test]
async fn find_by_field_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/cases/points/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), "cases", timeout()).unwrap();
    let err = client.find_by_field("CONTENT", "본문").await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)), "{err}");
}

#[tokio::test]
async fn upsert_waits_and_surfaces_status_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/collections/cases/points"))
        .and(query_param("wait", "true"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Collection `cases` doesn't exist!"))
        .expect(1)
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), "cases", timeout()).unwrap();
    let mut payload = Payload::new();
    payload.insert("source".into(), json!("csv-upload"));
    let point = Point { id: "8c5b7c1e-2f0a-4a55-9d8e-0d4b5f3e2a11".into(), vector: vec![0.1, 0.2], payload };

    match client.upsert(&point).await.unwrap_err() {
        StoreError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("doesn't exist"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn remote_embed_returns_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vector": [0.5, -0.5]})))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(&format!("{}/v1/embed", server.uri()), timeout()).unwrap();
    assert_eq!(provider.embed("x").await.unwrap(), vec![0.5, -0.5]);
    assert!(provider.provider_id().starts_with("remote:"));
}

#[tokio::test]
async fn remote_embed_validation_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "missing field `text`"})))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(&format!("{}/v1/embed", server.uri()), timeout()).unwrap();
    let err = provider.embed("x").await.unwrap_err();
    assert!(matches!(err, EmbedError::Status { status: 422, .. }), "{err}");
}

#[tokio::test]
async fn remote_embed_empty_vector_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vector": []})))
        .mount(&server)
        .await;

    let provider = RemoteProvider::new(&format!("{}/v1/embed", server.uri()), timeout()).unwrap();
    assert!(matches!(provider.embed("x").await.unwrap_err(), EmbedError::Decode(_)));
}
