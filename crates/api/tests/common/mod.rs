//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) on top
//! of an in-memory object store, plus request/response helpers around
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use talentdeck_api::auth::jwt::{generate_access_token, JwtConfig};
use talentdeck_api::auth::password::hash_password;
use talentdeck_api::config::ServerConfig;
use talentdeck_api::router::build_app_router;
use talentdeck_api::state::AppState;
use talentdeck_db::models::user::{CreateUser, User};
use talentdeck_db::repositories::{RoleRepo, UserRepo};
use talentdeck_storage::{ImageLimits, MemoryObjectStore};

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        max_upload_bytes: 10 * 1024 * 1024,
        signed_url_fallback: false,
        image_limits: ImageLimits::default(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the application router with all middleware layers, an in-memory
/// object store, and the default test config.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, MemoryObjectStore::new(), test_config())
}

/// Like [`build_test_app`], but reusing a store handle so tests can seed and
/// inspect stored objects.
pub fn build_test_app_with_store(pool: PgPool, store: MemoryObjectStore) -> Router {
    build_test_app_with(pool, store, test_config())
}

/// Fully parameterized router construction.
pub fn build_test_app_with(pool: PgPool, store: MemoryObjectStore, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(store),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user directly in the database with the given role name.
/// The account uses [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let role_id = RoleRepo::find_id_by_name(pool, role)
        .await
        .expect("role lookup should succeed")
        .unwrap_or_else(|| panic!("role '{role}' must be seeded"));

    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id,
        age_verified_at: Some(chrono::Utc::now()),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint a bearer token for a user without going through the login endpoint.
pub fn bearer_for(user: &User, role: &str) -> String {
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request with no auth header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, bearer: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", bearer)
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Issue a HEAD request with no auth header.
pub async fn head(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("HEAD")
        .uri(uri)
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Issue a JSON request with the given method and optional bearer token.
pub async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(bearer) = bearer {
        builder = builder.header("authorization", bearer);
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// POST JSON without auth.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "POST", uri, None, body).await
}

/// POST JSON with a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    bearer: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, "POST", uri, Some(bearer), body).await
}

/// POST with an empty body and a bearer token (action endpoints).
pub async fn post_auth(app: Router, uri: &str, bearer: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", bearer)
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// DELETE with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, bearer: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", bearer)
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection should succeed")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collection should succeed")
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

/// Boundary used by [`multipart_upload`] bodies.
pub const MULTIPART_BOUNDARY: &str = "talentdeck-test-boundary";

/// Build a multipart upload body with a `file` part and extra text fields.
pub fn multipart_body(
    file_bytes: &[u8],
    file_content_type: &str,
    fields: &[(&str, &str)],
) -> Vec<u8> {
    let mut body = Vec::new();

    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"photo.jpg\"\r\n\
             Content-Type: {file_content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(b"\r\n");

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart upload to `/api/v1/media`.
pub async fn multipart_upload(
    app: Router,
    bearer: Option<&str>,
    file_bytes: &[u8],
    file_content_type: &str,
    fields: &[(&str, &str)],
) -> Response<Body> {
    let body = multipart_body(file_bytes, file_content_type, fields);
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/media")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        );
    if let Some(bearer) = bearer {
        builder = builder.header("authorization", bearer);
    }
    let request = builder
        .body(Body::from(body))
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// A small valid JPEG for upload fixtures.
pub fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageBuffer, Rgb};
    let buf: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgb([120, 80, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(buf)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .expect("fixture encoding should succeed");
    out.into_inner()
}

/// Assert a response is a JSON error with the given status.
pub async fn assert_error(response: Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert!(
        json["error"].is_string(),
        "error responses must carry an error message"
    );
}
