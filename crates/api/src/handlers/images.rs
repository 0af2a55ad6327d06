//! Access-controlled media retrieval: GET/HEAD `/images/{filename}`.
//!
//! Pipeline: locate the media record for the requested identifier, evaluate
//! the access policy, resolve the object-store key, then fetch -- walking a
//! short ordered list of alternate keys when the primary misses. The
//! alternates exist because older upload revisions recorded inconsistent
//! keys; they are a migration shim, not a resilience feature.
//!
//! HEAD requests are routed through the same handler; axum strips the body.

use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use talentdeck_core::error::CoreError;
use talentdeck_core::media_access::{self, AccessDecision, Caller, DenyReason, RecordFlags};
use talentdeck_core::media_keys::{alternate_keys, resolve_object_key};
use talentdeck_db::models::media::Media;
use talentdeck_db::repositories::MediaRepo;
use talentdeck_storage::StorageError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::state::AppState;

/// Lifetime of presigned URLs issued by the redirect fallback.
const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(3600);

const CACHE_PUBLIC: &str = "public, max-age=3600, stale-while-revalidate=86400";
const CACHE_PRIVATE: &str = "private, max-age=3600";

/// GET /api/v1/images/{filename}
///
/// The path parameter is a URL-encoded identifier: usually the basename of a
/// stored object key, sometimes a full key or a thumbnail name. Anonymous
/// requests are served only approved, public media.
pub async fn serve_image(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let caller = user.map(|u| u.caller());

    let media = MediaRepo::find_by_requested_key(&state.pool, &filename).await?;
    let flags = media.as_ref().map(|m| RecordFlags {
        owner_id: m.user_id,
        is_approved: m.is_approved,
        is_public: m.is_public,
    });

    match (media_access::evaluate(caller.as_ref(), flags.as_ref()), media) {
        (AccessDecision::Deny(reason), _) => {
            tracing::debug!(
                filename = %filename,
                caller = ?caller.as_ref().map(|c| c.user_id),
                ?reason,
                "Image access denied"
            );
            Err(deny_error(reason))
        }
        (AccessDecision::GrantDirectFetch, _) => direct_fetch(&state, &filename).await,
        (AccessDecision::Grant, Some(media)) => {
            serve_record(&state, caller.as_ref(), &filename, media).await
        }
        // `evaluate` only grants a plain fetch when a record exists.
        (AccessDecision::Grant, None) => Err(AppError::InternalError(
            "access granted without a media record".into(),
        )),
    }
}

/// Admin path for identifiers with no matching record: fetch the raw
/// identifier straight from the store. Misses surface as 404, not 500 --
/// the admin is probing, there is no record to vouch for the key.
async fn direct_fetch(state: &AppState, filename: &str) -> AppResult<Response> {
    match state.store.get(filename).await {
        Ok(bytes) => Ok(image_response(bytes, "image/jpeg", CACHE_PRIVATE)),
        Err(e) => {
            tracing::debug!(filename, error = %e, "Direct store fetch failed");
            Err(AppError::NotFound("Image not found".into()))
        }
    }
}

/// Serve a located, access-granted record.
async fn serve_record(
    state: &AppState,
    caller: Option<&Caller>,
    filename: &str,
    media: Media,
) -> AppResult<Response> {
    let primary = resolve_object_key(filename, &media.object_key);

    let mut keys = vec![primary.clone()];
    keys.extend(alternate_keys(
        filename,
        &media.object_key,
        media.user_id,
        caller.map(|c| c.user_id),
        &primary,
    ));

    let cache = if media.is_approved && media.is_public {
        CACHE_PUBLIC
    } else {
        CACHE_PRIVATE
    };

    for key in &keys {
        match state.store.get(key).await {
            Ok(bytes) => {
                tracing::debug!(filename, key = %key, size = bytes.len(), "Serving image");
                MediaRepo::increment_view_count(&state.pool, media.id).await?;
                return Ok(image_response(bytes, &media.mime_type, cache));
            }
            Err(StorageError::NotFound { .. }) => continue,
            Err(e) => {
                // Transient backend failures should not abort the walk; the
                // next candidate may live on a healthier path.
                tracing::warn!(filename, key = %key, error = %e, "Store fetch failed");
                continue;
            }
        }
    }

    // Every candidate missed. Optionally hand the client a presigned URL for
    // the primary key instead of failing outright.
    if state.config.signed_url_fallback {
        if let Ok(url) = state.store.signed_url(&primary, SIGNED_URL_EXPIRY).await {
            tracing::info!(filename, key = %primary, "Redirecting to signed URL");
            return Response::builder()
                .status(StatusCode::FOUND)
                .header(LOCATION, url)
                .body(Body::empty())
                .map_err(|e| AppError::InternalError(e.to_string()));
        }
    }

    Err(AppError::Core(CoreError::Retrieval(format!(
        "no object found for '{filename}' after {} candidate keys",
        keys.len()
    ))))
}

/// Map a policy denial onto the error taxonomy (401/403/404).
fn deny_error(reason: DenyReason) -> AppError {
    match reason {
        DenyReason::AuthenticationRequired => {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        }
        DenyReason::Forbidden => AppError::Core(CoreError::Forbidden(
            "You do not have access to this image".into(),
        )),
        DenyReason::NotFound => AppError::NotFound("Image not found".into()),
    }
}

/// 200 response with image bytes and the standard media headers.
fn image_response(bytes: Bytes, content_type: &str, cache: &'static str) -> Response {
    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        content_type
            .parse()
            .unwrap_or_else(|_| HeaderValue::from_static("image/jpeg")),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache));
    headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
    response
}
