//! HTTP-level integration tests for registration, login, token refresh,
//! logout, and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;
use talentdeck_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Log in a user via the API and return the JSON response containing
/// `access_token`, `refresh_token`, and `user` info.
async fn login_user(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 and lowercases the identifiers.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "email": "New.Member@Example.com",
        "username": "NewMember",
        "password": "a-strong-password",
        "birth_date": "1995-06-15",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "newmember");
    assert_eq!(json["email"], "new.member@example.com");

    let user = UserRepo::find_by_username(&pool, "newmember")
        .await
        .expect("lookup should succeed")
        .expect("user must exist");
    assert!(user.age_verified_at.is_some());
}

/// Members under 18 are rejected.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_under_18_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let recent = chrono::Utc::now().date_naive() - chrono::Duration::days(17 * 365);
    let body = serde_json::json!({
        "email": "kid@example.com",
        "username": "tooyoung",
        "password": "a-strong-password",
        "birth_date": recent.to_string(),
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Duplicate email or username returns 409.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_duplicate_conflicts(pool: PgPool) {
    common::create_user(&pool, "taken", "talent").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "taken@test.com",
        "username": "someoneelse",
        "password": "a-strong-password",
        "birth_date": "1990-01-01",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = serde_json::json!({
        "email": "fresh@test.com",
        "username": "Taken",
        "password": "a-strong-password",
        "birth_date": "1990-01-01",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Weak passwords are rejected with a clear message.
#[sqlx::test(migrations = "../../migrations")]
async fn test_register_short_password_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "email": "weak@example.com",
        "username": "weakpw",
        "password": "short",
        "birth_date": "1990-01-01",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap_or_default()
        .contains("at least 8 characters"));
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with access_token, refresh_token, and user info.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_success(pool: PgPool) {
    let user = common::create_user(&pool, "loginuser", "talent").await;
    let app = common::build_test_app(pool);

    let json = login_user(app, "loginuser", TEST_PASSWORD).await;

    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert!(json["refresh_token"].is_string(), "response must contain refresh_token");
    assert!(json["expires_in"].is_number(), "response must contain expires_in");
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], "talent");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_user(&pool, "wrongpw", "talent").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login to a deactivated account returns 403.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = common::create_user(&pool, "inactive", "talent").await;
    UserRepo::deactivate(&pool, user.id)
        .await
        .expect("deactivation should succeed");

    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Five failed attempts lock the account; the correct password then fails
/// with 403 until the lock expires.
#[sqlx::test(migrations = "../../migrations")]
async fn test_login_lockout_after_failures(pool: PgPool) {
    common::create_user(&pool, "lockme", "talent").await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let body = serde_json::json!({ "username": "lockme", "password": "bad_password" });
        let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let body = serde_json::json!({ "username": "lockme", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

/// A valid refresh token returns new tokens, and the old one stops working.
#[sqlx::test(migrations = "../../migrations")]
async fn test_token_refresh_rotates(pool: PgPool) {
    common::create_user(&pool, "refresher", "talent").await;
    let app = common::build_test_app(pool);

    let login_json = login_user(app.clone(), "refresher", TEST_PASSWORD).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(
        json["refresh_token"].as_str().unwrap(),
        refresh_token,
        "refresh token must rotate on use"
    );

    // The consumed token is revoked.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Refreshing with a garbage token returns 401.
#[sqlx::test(migrations = "../../migrations")]
async fn test_refresh_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes all sessions and returns 204.
#[sqlx::test(migrations = "../../migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    common::create_user(&pool, "leaver", "talent").await;
    let app = common::build_test_app(pool);

    let login_json = login_user(app.clone(), "leaver", TEST_PASSWORD).await;
    let access = format!("Bearer {}", login_json["access_token"].as_str().unwrap());
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        &access,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
