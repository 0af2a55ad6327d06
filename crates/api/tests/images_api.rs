//! HTTP-level integration tests for the access-controlled image endpoint.
//!
//! Covers the access decision table (anonymous/owner/admin/producer), the
//! locator's recency tie-break, key resolution including thumbnails and
//! legacy layouts, the alternate-key fallback walk, the presigned-redirect
//! fallback, and HEAD handling.

mod common;

use axum::http::StatusCode;
use bytes::Bytes;
use common::{bearer_for, body_bytes, body_json, get, get_auth, head};
use sqlx::PgPool;
use talentdeck_db::models::media::{CreateMedia, Media};
use talentdeck_db::models::user::User;
use talentdeck_db::repositories::MediaRepo;
use talentdeck_storage::{MemoryObjectStore, ObjectStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a media row and store its bytes under the canonical key layout.
async fn seed_media(
    pool: &PgPool,
    store: &MemoryObjectStore,
    owner: &User,
    basename: &str,
    approved: bool,
    public: bool,
    bytes: &[u8],
) -> Media {
    let object_key = format!("{}/{basename}", owner.id);
    let thumbnail_key = format!("{}/thumb_{basename}", owner.id);

    store
        .put(&object_key, Bytes::copy_from_slice(bytes), "image/jpeg")
        .await
        .expect("seed put should succeed");
    store
        .put(&thumbnail_key, Bytes::from_static(b"thumb-bytes"), "image/jpeg")
        .await
        .expect("seed put should succeed");

    let media = MediaRepo::create(
        pool,
        &CreateMedia {
            user_id: owner.id,
            object_key: object_key.clone(),
            url: format!("http://localhost:3000/api/v1/images/{basename}"),
            thumbnail_url: Some(format!(
                "http://localhost:3000/api/v1/images/thumb_{basename}"
            )),
            mime_type: "image/jpeg".to_string(),
            size_bytes: bytes.len() as i64,
            title: None,
            description: None,
            is_profile_photo: false,
            is_public: public,
            is_explicit: false,
        },
    )
    .await
    .expect("seed media creation should succeed");

    if approved {
        MediaRepo::approve(pool, media.id)
            .await
            .expect("seed approval should succeed");
    }

    MediaRepo::find_by_id(pool, media.id)
        .await
        .expect("seed lookup should succeed")
        .expect("seeded media must exist")
}

// ---------------------------------------------------------------------------
// Access decision table
// ---------------------------------------------------------------------------

/// Approved + public media is served to anonymous callers with a public
/// cache header.
#[sqlx::test(migrations = "../../migrations")]
async fn test_anonymous_get_approved_public(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "pubowner", "talent").await;
    seed_media(&pool, &store, &owner, "abc.jpg", true, true, b"main-bytes").await;

    let app = common::build_test_app_with_store(pool, store);
    let response = get(app, "/api/v1/images/abc.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    let cache = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cache.contains("public"), "expected public cache header, got: {cache}");
    assert_eq!(
        response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok()),
        Some("inline")
    );
    assert_eq!(body_bytes(response).await, b"main-bytes");
}

/// Unapproved media denies anonymous callers with 401, not 404.
#[sqlx::test(migrations = "../../migrations")]
async fn test_anonymous_get_unapproved_is_401(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "privowner", "talent").await;
    seed_media(&pool, &store, &owner, "priv.jpg", false, true, b"x").await;

    let app = common::build_test_app_with_store(pool, store);
    let response = get(app, "/api/v1/images/priv.jpg").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Owners see their own media regardless of approval or visibility, with a
/// private cache header.
#[sqlx::test(migrations = "../../migrations")]
async fn test_owner_sees_own_unapproved_photo(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "selfowner", "talent").await;
    seed_media(&pool, &store, &owner, "mine.jpg", false, false, b"my-bytes").await;

    let app = common::build_test_app_with_store(pool, store);
    let bearer = bearer_for(&owner, "talent");
    let response = get_auth(app, "/api/v1/images/mine.jpg", &bearer).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cache = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cache.contains("private"), "expected private cache header, got: {cache}");
    assert_eq!(body_bytes(response).await, b"my-bytes");
}

/// Strict producer policy: approved but private media stays 403.
#[sqlx::test(migrations = "../../migrations")]
async fn test_producer_needs_public_flag(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "talentowner", "talent").await;
    let producer = common::create_user(&pool, "producer1", "producer").await;
    seed_media(&pool, &store, &owner, "appr.jpg", true, false, b"x").await;

    let app = common::build_test_app_with_store(pool.clone(), store);
    let bearer = bearer_for(&producer, "producer");
    let response = get_auth(app, "/api/v1/images/appr.jpg", &bearer).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// A non-owner talent never sees unapproved media: 403, never 200.
#[sqlx::test(migrations = "../../migrations")]
async fn test_other_talent_gets_403_on_unapproved(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "uploader", "talent").await;
    let other = common::create_user(&pool, "other", "talent").await;
    seed_media(&pool, &store, &owner, "unap.jpg", false, true, b"x").await;

    let app = common::build_test_app_with_store(pool, store);
    let bearer = bearer_for(&other, "talent");
    let response = get_auth(app, "/api/v1/images/unap.jpg", &bearer).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Admins see any record.
#[sqlx::test(migrations = "../../migrations")]
async fn test_admin_sees_any_record(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "hidden", "talent").await;
    let admin = common::create_user(&pool, "admin1", "admin").await;
    seed_media(&pool, &store, &owner, "h.jpg", false, false, b"hidden-bytes").await;

    let app = common::build_test_app_with_store(pool, store);
    let bearer = bearer_for(&admin, "admin");
    let response = get_auth(app, "/api/v1/images/h.jpg", &bearer).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"hidden-bytes");
}

// ---------------------------------------------------------------------------
// Unmatched identifiers
// ---------------------------------------------------------------------------

/// No matching record: 404 for anonymous and regular callers alike.
#[sqlx::test(migrations = "../../migrations")]
async fn test_unmatched_identifier_is_404(pool: PgPool) {
    let talent = common::create_user(&pool, "nobody", "talent").await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/images/ghost.jpg").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bearer = bearer_for(&talent, "talent");
    let response = get_auth(app, "/api/v1/images/ghost.jpg", &bearer).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Admins may probe the store directly for identifiers with no record.
#[sqlx::test(migrations = "../../migrations")]
async fn test_admin_direct_fetch_without_record(pool: PgPool) {
    let store = MemoryObjectStore::new();
    store
        .put("orphan.jpg", Bytes::from_static(b"orphan-bytes"), "image/jpeg")
        .await
        .expect("seed put should succeed");

    let admin = common::create_user(&pool, "admin2", "admin").await;
    let app = common::build_test_app_with_store(pool, store);
    let bearer = bearer_for(&admin, "admin");

    let response = get_auth(app.clone(), "/api/v1/images/orphan.jpg", &bearer).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"orphan-bytes");

    // A direct-fetch miss is a 404, not a retrieval failure.
    let response = get_auth(app, "/api/v1/images/missing.jpg", &bearer).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Locator tie-break
// ---------------------------------------------------------------------------

/// Two records match the same basename: the most recently created row
/// decides both access and the served bytes.
#[sqlx::test(migrations = "../../migrations")]
async fn test_most_recent_record_wins_ties(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let older = common::create_user(&pool, "olduser", "talent").await;
    let newer = common::create_user(&pool, "newuser", "talent").await;

    seed_media(&pool, &store, &older, "shared.jpg", true, true, b"old-bytes").await;
    seed_media(&pool, &store, &newer, "shared.jpg", false, false, b"new-bytes").await;

    // The newer record is private, so the anonymous caller is challenged
    // even though an older approved+public record also matches.
    let app = common::build_test_app_with_store(pool.clone(), store.clone());
    let response = get(app, "/api/v1/images/shared.jpg").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The newer record's owner gets the newer object.
    let app = common::build_test_app_with_store(pool, store);
    let bearer = bearer_for(&newer, "talent");
    let response = get_auth(app, "/api/v1/images/shared.jpg", &bearer).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"new-bytes");
}

// ---------------------------------------------------------------------------
// Key resolution and fallback walk
// ---------------------------------------------------------------------------

/// Thumbnail identifiers resolve onto the record's path segment.
#[sqlx::test(migrations = "../../migrations")]
async fn test_thumbnail_request_serves_thumbnail(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "thumbowner", "talent").await;
    seed_media(&pool, &store, &owner, "pic.jpg", true, true, b"full-bytes").await;

    let app = common::build_test_app_with_store(pool, store);
    let response = get(app, "/api/v1/images/thumb_pic.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"thumb-bytes");
}

/// Objects written by the legacy role-scoped upload path are still served
/// through the alternate-key walk.
#[sqlx::test(migrations = "../../migrations")]
async fn test_legacy_role_prefixed_key_is_found(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "legacy", "talent").await;

    // Record claims the canonical layout, but the object actually lives
    // under the historical talent/ prefix.
    let media = MediaRepo::create(
        &pool,
        &CreateMedia {
            user_id: owner.id,
            object_key: format!("{}/legacy.jpg", owner.id),
            url: "http://localhost:3000/api/v1/images/legacy.jpg".to_string(),
            thumbnail_url: None,
            mime_type: "image/jpeg".to_string(),
            size_bytes: 11,
            title: None,
            description: None,
            is_profile_photo: false,
            is_public: true,
            is_explicit: false,
        },
    )
    .await
    .expect("media creation should succeed");
    MediaRepo::approve(&pool, media.id)
        .await
        .expect("approval should succeed");

    store
        .put(
            &format!("talent/{}/legacy.jpg", owner.id),
            Bytes::from_static(b"legacy-bytes"),
            "image/jpeg",
        )
        .await
        .expect("seed put should succeed");

    let app = common::build_test_app_with_store(pool, store);
    let response = get(app, "/api/v1/images/legacy.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"legacy-bytes");
}

/// All candidate keys missing: 500 retrieval failure with a JSON error.
#[sqlx::test(migrations = "../../migrations")]
async fn test_exhausted_alternates_is_500(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "lost", "talent").await;

    let media = MediaRepo::create(
        &pool,
        &CreateMedia {
            user_id: owner.id,
            object_key: format!("{}/lost.jpg", owner.id),
            url: "http://localhost:3000/api/v1/images/lost.jpg".to_string(),
            thumbnail_url: None,
            mime_type: "image/jpeg".to_string(),
            size_bytes: 1,
            title: None,
            description: None,
            is_profile_photo: false,
            is_public: true,
            is_explicit: false,
        },
    )
    .await
    .expect("media creation should succeed");
    MediaRepo::approve(&pool, media.id)
        .await
        .expect("approval should succeed");

    let app = common::build_test_app_with_store(pool, store);
    let response = get(app, "/api/v1/images/lost.jpg").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RETRIEVAL_FAILED");
}

/// With the fallback enabled, exhausted alternates redirect to a signed URL
/// for the primary key instead of failing with 500.
#[sqlx::test(migrations = "../../migrations")]
async fn test_signed_url_fallback_redirects(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "signer", "talent").await;

    // Record exists; no object does. Every candidate key misses.
    let media = MediaRepo::create(
        &pool,
        &CreateMedia {
            user_id: owner.id,
            object_key: format!("{}/signed.jpg", owner.id),
            url: "http://localhost:3000/api/v1/images/signed.jpg".to_string(),
            thumbnail_url: None,
            mime_type: "image/jpeg".to_string(),
            size_bytes: 1,
            title: None,
            description: None,
            is_profile_photo: false,
            is_public: true,
            is_explicit: false,
        },
    )
    .await
    .expect("media creation should succeed");
    MediaRepo::approve(&pool, media.id)
        .await
        .expect("approval should succeed");

    let mut config = common::test_config();
    config.signed_url_fallback = true;

    let app = common::build_test_app_with(pool, store, config);
    let response = get(app, "/api/v1/images/signed.jpg").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        location.starts_with(&format!("memory://{}/signed.jpg", owner.id)),
        "unexpected redirect target: {location}"
    );
}

// ---------------------------------------------------------------------------
// HEAD and bookkeeping
// ---------------------------------------------------------------------------

/// HEAD follows the same access rules and returns headers without a body.
#[sqlx::test(migrations = "../../migrations")]
async fn test_head_request_has_no_body(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "header", "talent").await;
    seed_media(&pool, &store, &owner, "hd.jpg", true, true, b"head-bytes").await;

    let app = common::build_test_app_with_store(pool, store);

    let response = head(app.clone(), "/api/v1/images/hd.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty(), "HEAD must not carry a body");

    // Denials apply identically.
    let response = head(app, "/api/v1/images/ghost.jpg").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Successful serves bump the view counter.
#[sqlx::test(migrations = "../../migrations")]
async fn test_view_count_increments_on_serve(pool: PgPool) {
    let store = MemoryObjectStore::new();
    let owner = common::create_user(&pool, "counted", "talent").await;
    let media = seed_media(&pool, &store, &owner, "vc.jpg", true, true, b"x").await;
    assert_eq!(media.view_count, 0);

    let app = common::build_test_app_with_store(pool.clone(), store);
    let response = get(app.clone(), "/api/v1/images/vc.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(app, "/api/v1/images/vc.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = MediaRepo::find_by_id(&pool, media.id)
        .await
        .expect("lookup should succeed")
        .expect("media must exist");
    assert_eq!(after.view_count, 2);
}
