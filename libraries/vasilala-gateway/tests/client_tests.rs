//! HTTP-level tests for the gateway client
//!
//! Runs the client against a wiremock server: query decoding, token
//! refresh on 401, error mapping, identity, and upload progress.

use serde_json::json;
use std::sync::{Arc, Mutex};
use vasilala_core::{
    CoreError, Document, DocumentGateway, FromDocument, IdentityGateway, ObjectStore, QueryFilter,
};
use vasilala_gateway::{GatewayClient, GatewayConfig};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("vasilala_gateway=debug")
        .with_test_writer()
        .try_init();
}

async fn client_for(server: &MockServer) -> GatewayClient {
    let client = GatewayClient::new(GatewayConfig::new(server.uri())).unwrap();
    client.set_tokens("valid-token".into(), None).await;
    client
}

fn track_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Track {id}"),
        "artist": "Nova Pulse",
        "duration_secs": 215,
        "audio_url": format!("https://cdn.example/{id}.mp3"),
        "plays": 10,
        "likes": 3,
        "shares": 1,
        "moderation": "approved"
    })
}

#[tokio::test]
async fn query_decodes_documents_and_sends_cursor() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/tracks/query"))
        .and(body_partial_json(json!({ "limit": 2, "after": "t1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([track_json("t2"), track_json("t3")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let documents = client
        .query_after("tracks", &QueryFilter::new(), "t1", 2)
        .await
        .unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].str_field("id"), Ok("t2"));
}

#[tokio::test]
async fn expired_token_refreshes_and_retries_once() {
    init_tracing();
    let server = MockServer::start().await;

    // Stale token is rejected
    Mock::given(method("POST"))
        .and(path("/api/documents/tracks/query"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    // Refresh endpoint issues a fresh pair
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_partial_json(json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Retry with the fresh token succeeds
    Mock::given(method("POST"))
        .and(path("/api/documents/tracks/query"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([track_json("t1")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GatewayClient::new(GatewayConfig::new(server.uri())).unwrap();
    client.set_tokens("stale".into(), Some("r1".into())).await;

    let documents = client.query("tracks", &QueryFilter::new(), 10).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(client.tokens().await.0.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn api_key_rides_on_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/tracks/t1"))
        .and(header("x-api-key", "project-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json("t1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(server.uri());
    config.api_key = Some("project-key".to_string());
    let client = GatewayClient::new(config).unwrap();
    client.set_tokens("valid-token".into(), None).await;

    client.get("tracks", "t1").await.unwrap();
}

#[tokio::test]
async fn rate_limit_maps_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/posts/p1/increment"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.increment("posts", "p1", "likes", 1).await;

    assert!(matches!(
        result,
        Err(CoreError::RateLimited { retry_after_secs: 7 })
    ));
}

#[tokio::test]
async fn missing_document_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/tracks/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.get("tracks", "ghost").await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/documents/posts/p1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client.delete("posts", "p1").await.unwrap_err();
    assert!(error.to_string().contains("500"));
}

#[tokio::test]
async fn field_operations_post_expected_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/playlists/pl1/array-union"))
        .and(body_partial_json(json!({ "field": "tracks", "value": "t9" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/documents/playlists/pl1/increment"))
        .and(body_partial_json(json!({ "field": "track_count", "delta": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .array_union("playlists", "pl1", "tracks", json!("t9"))
        .await
        .unwrap();
    client
        .increment("playlists", "pl1", "track_count", 1)
        .await
        .unwrap();
}

#[tokio::test]
async fn sign_in_stores_tokens_and_notifies_subscribers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a1",
            "refresh_token": "r1",
            "user": {
                "id": "u1",
                "display_name": "Ana",
                "role": "artist",
                "verification": "approved"
            }
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(GatewayConfig::new(server.uri())).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.on_session_change(Box::new(move |session| {
        sink.lock().unwrap().push(session.is_some());
    }));

    let session = client.sign_in("ana@example.com", "secret").await.unwrap();
    assert_eq!(session.profile.display_name, "Ana");
    assert!(session.profile.can_publish_tracks());
    assert!(client.is_authenticated().await);

    client.sign_out().await.unwrap();
    assert!(!client.is_authenticated().await);

    assert_eq!(seen.lock().unwrap().as_slice(), &[true, false]);
}

#[tokio::test]
async fn rejected_credentials_map_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let client = GatewayClient::new(GatewayConfig::new(server.uri())).unwrap();
    let result = client.sign_in("ana@example.com", "wrong").await;
    assert!(matches!(result, Err(CoreError::Auth(_))));
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn upload_reports_monotonic_progress() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/objects/clips/c1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://cdn.example/clips/c1.mp4"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let progress = Arc::new(Mutex::new(Vec::<f32>::new()));
    let sink = Arc::clone(&progress);

    let url = client
        .upload(
            "clips/c1.mp4",
            vec![0u8; 200 * 1024],
            "video/mp4",
            Some(Arc::new(move |fraction| {
                sink.lock().unwrap().push(fraction);
            })),
        )
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example/clips/c1.mp4");
    let progress = progress.lock().unwrap();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(*progress.last().unwrap(), 1.0);
}

#[tokio::test]
async fn invalid_upload_rejected_before_any_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let result = client
        .upload("docs/report.pdf", vec![1, 2, 3], "application/pdf", None)
        .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    let result = client.upload("clips/empty.mp4", vec![], "video/mp4", None).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn decoded_document_round_trips_into_entity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/tracks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json("t1")))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let document: Document = client.get("tracks", "t1").await.unwrap();
    let track = vasilala_core::Track::from_document(&document).unwrap();
    assert_eq!(track.title, "Track t1");
    assert_eq!(track.likes, 3);
}
