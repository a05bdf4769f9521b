//! Coordinator endpoint tests: slot batches are minted per-file, in request
//! order, behind authentication, and a single signing failure aborts the
//! whole call.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nivaran_api::auth::JwtService;
use nivaran_api::setup::routes::setup_routes;
use nivaran_api::state::AppState;
use nivaran_core::models::UserRole;
use nivaran_core::Config;
use nivaran_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_SECRET: &str = "upload-urls-test-secret";

/// Storage stub: signs deterministically, optionally failing from the Nth
/// signing request onward.
struct MockStorage {
    signed: AtomicUsize,
    fail_from: Option<usize>,
}

impl MockStorage {
    fn new() -> Self {
        MockStorage {
            signed: AtomicUsize::new(0),
            fail_from: None,
        }
    }

    fn failing_from(n: usize) -> Self {
        MockStorage {
            signed: AtomicUsize::new(0),
            fail_from: Some(n),
        }
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        let n = self.signed.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_from) = self.fail_from {
            if n >= fail_from {
                return Err(StorageError::SigningFailed(
                    "mock gateway unavailable".to_string(),
                ));
            }
        }
        Ok(format!("https://gateway.mock/{}?sig=test", storage_key))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(true)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

fn build_app(storage: Arc<dyn Storage>) -> Router {
    let config = Config::for_tests("postgres://localhost/nivaran_test", TEST_SECRET);
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(config.database_url())
        .expect("lazy pool");
    let state = Arc::new(AppState::new(config.clone(), pool, storage));
    setup_routes(&config, state).expect("router")
}

fn token_for(user_id: Uuid, role: UserRole) -> String {
    JwtService::new(TEST_SECRET, 1)
        .issue(user_id, role, None)
        .expect("token")
}

fn upload_urls_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/files/get-upload-urls")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = build_app(Arc::new(MockStorage::new()));

    let request = upload_urls_request(
        None,
        serde_json::json!({ "files": [{ "name": "a.jpg", "type": "image/jpeg" }] }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_bearer_token_is_unauthorized() {
    let app = build_app(Arc::new(MockStorage::new()));

    let request = upload_urls_request(
        Some("not.a.valid.token"),
        serde_json::json!({ "files": [{ "name": "a.jpg", "type": "image/jpeg" }] }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn slot_batch_matches_request_length_and_order() {
    let app = build_app(Arc::new(MockStorage::new()));
    let user_id = Uuid::new_v4();
    let token = token_for(user_id, UserRole::User);

    let request = upload_urls_request(
        Some(&token),
        serde_json::json!({ "files": [
            { "name": "pothole.jpg", "type": "image/jpeg" },
            { "name": "clip.mp4", "type": "video/mp4" },
            { "name": "note.mp3", "type": "audio/mpeg" }
        ]}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let slots = json["uploadUrls"].as_array().expect("uploadUrls array");
    assert_eq!(slots.len(), 3);

    let prefix = format!("uploads/{}/", user_id);
    for (slot, (source, ext)) in slots.iter().zip([
        ("pothole.jpg", ".jpg"),
        ("clip.mp4", ".mp4"),
        ("note.mp3", ".mp3"),
    ]) {
        assert_eq!(slot["sourceName"], source);
        let key = slot["fileName"].as_str().unwrap();
        assert!(key.starts_with(&prefix), "key {} missing user prefix", key);
        assert!(key.ends_with(ext), "key {} missing extension {}", key, ext);
        assert!(slot["signedUrl"].as_str().unwrap().contains(key));
    }
}

#[tokio::test]
async fn keys_differ_across_attempts_with_identical_names() {
    let app = build_app(Arc::new(MockStorage::new()));
    let token = token_for(Uuid::new_v4(), UserRole::User);
    let body = serde_json::json!({ "files": [{ "name": "evidence.jpg", "type": "image/jpeg" }] });

    let first = body_json(
        app.clone()
            .oneshot(upload_urls_request(Some(&token), body.clone()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(upload_urls_request(Some(&token), body))
            .await
            .unwrap(),
    )
    .await;

    assert_ne!(
        first["uploadUrls"][0]["fileName"],
        second["uploadUrls"][0]["fileName"]
    );
}

#[tokio::test]
async fn empty_batch_is_invalid() {
    let app = build_app(Arc::new(MockStorage::new()));
    let token = token_for(Uuid::new_v4(), UserRole::User);

    let request = upload_urls_request(Some(&token), serde_json::json!({ "files": [] }));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn empty_file_name_is_invalid() {
    let app = build_app(Arc::new(MockStorage::new()));
    let token = token_for(Uuid::new_v4(), UserRole::User);

    let request = upload_urls_request(
        Some(&token),
        serde_json::json!({ "files": [{ "name": "", "type": "image/jpeg" }] }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_signing_failure_aborts_whole_batch() {
    // Second signing request fails: the response must be a whole-call error,
    // never a partial batch.
    let app = build_app(Arc::new(MockStorage::failing_from(1)));
    let token = token_for(Uuid::new_v4(), UserRole::User);

    let request = upload_urls_request(
        Some(&token),
        serde_json::json!({ "files": [
            { "name": "a.jpg", "type": "image/jpeg" },
            { "name": "b.mp4", "type": "video/mp4" }
        ]}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert!(json.get("uploadUrls").is_none());
}

#[tokio::test]
async fn citizen_token_cannot_reach_head_routes() {
    let app = build_app(Arc::new(MockStorage::new()));
    let token = token_for(Uuid::new_v4(), UserRole::User);

    let request = Request::builder()
        .method("GET")
        .uri("/api/head/complaints")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn head_token_can_reach_file_routes() {
    // The upload coordinator is open to any authenticated role; the
    // department close flow uses it too.
    let app = build_app(Arc::new(MockStorage::new()));
    let token = token_for(Uuid::new_v4(), UserRole::Head);

    let request = upload_urls_request(
        Some(&token),
        serde_json::json!({ "files": [{ "name": "solved.jpg", "type": "image/jpeg" }] }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
