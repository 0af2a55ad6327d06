//! Handlers for the `/media` resource: upload, gallery, visibility,
//! profile-photo designation, deletion.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use talentdeck_core::error::CoreError;
use talentdeck_core::media_keys::{basename, thumbnail_key_for};
use talentdeck_core::types::DbId;
use talentdeck_db::models::media::{CreateMedia, Media};
use talentdeck_db::repositories::MediaRepo;
use talentdeck_storage::store_image;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// MIME types accepted by the upload endpoint. Everything is re-encoded as
/// JPEG by the pipeline regardless of the input format.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Multipart fields accompanying an upload.
#[derive(Debug, Default)]
struct UploadFields {
    file: Option<(Vec<u8>, String)>,
    title: Option<String>,
    description: Option<String>,
    is_profile_photo: bool,
    is_public: bool,
    is_explicit: bool,
}

/// Request body for `PATCH /media/{id}/visibility`.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/media
///
/// Multipart upload: `file` plus optional `title`, `description`,
/// `is_profile_photo`, `is_public`, `is_explicit` fields. The stored record
/// starts unapproved; an admin must approve it before it appears publicly.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Media>>)> {
    let fields = collect_upload_fields(multipart, state.config.max_upload_bytes).await?;

    let (data, mime_type) = fields.file.ok_or_else(|| {
        AppError::Core(CoreError::Validation("No file provided".into()))
    })?;

    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(AppError::Core(CoreError::Validation(
            "File must be JPEG, PNG, or WebP".into(),
        )));
    }

    let stored = store_image(
        state.store.as_ref(),
        data,
        user.user_id,
        state.config.image_limits,
    )
    .await?;

    // Clients fetch media through the API, never from the store directly.
    let url = image_api_url(&state, &stored.object_key);
    let thumbnail_url = image_api_url(&state, &stored.thumbnail_key);

    let media = MediaRepo::create(
        &state.pool,
        &CreateMedia {
            user_id: user.user_id,
            object_key: stored.object_key,
            url,
            thumbnail_url: Some(thumbnail_url),
            mime_type: stored.mime_type,
            size_bytes: stored.size_bytes,
            title: fields.title,
            description: fields.description,
            is_profile_photo: false,
            is_public: fields.is_public,
            is_explicit: fields.is_explicit,
        },
    )
    .await?;

    // Designation clears any previous profile photo inside one transaction,
    // so it cannot race with the insert above.
    let media = if fields.is_profile_photo {
        MediaRepo::set_profile_photo(&state.pool, media.id, user.user_id).await?;
        MediaRepo::find_by_id(&state.pool, media.id)
            .await?
            .unwrap_or(media)
    } else {
        media
    };

    tracing::info!(
        media_id = media.id,
        user_id = user.user_id,
        size_bytes = media.size_bytes,
        "Media uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}

/// GET /api/v1/media
///
/// The authenticated user's own gallery, newest first, all flags included.
pub async fn list_own(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Media>>>> {
    let media = MediaRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: media }))
}

/// DELETE /api/v1/media/{id}
///
/// Owners (and admins) delete a media row along with both backing objects.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;

    if media.user_id != user.user_id && !user.caller().is_admin() {
        return Err(AppError::Core(CoreError::NotFound { entity: "Media", id }));
    }

    delete_backing_objects(&state, &media).await;

    let deleted = MediaRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(media_id = id, user_id = user.user_id, "Media deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Media", id }))
    }
}

/// PATCH /api/v1/media/{id}/visibility
///
/// Owner toggles the public/private flag.
pub async fn set_visibility(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<VisibilityRequest>,
) -> AppResult<Json<DataResponse<Media>>> {
    let media = MediaRepo::set_visibility(&state.pool, id, user.user_id, input.is_public)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;
    Ok(Json(DataResponse { data: media }))
}

/// POST /api/v1/media/{id}/profile-photo
///
/// Designate one of the caller's media rows as the profile photo. Any
/// previous designation is cleared in the same transaction.
pub async fn set_profile_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = MediaRepo::set_profile_photo(&state.pool, id, user.user_id).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Media", id }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drain the multipart stream into [`UploadFields`], enforcing the size cap.
async fn collect_upload_fields(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> AppResult<UploadFields> {
    let mut fields = UploadFields {
        is_public: true,
        ..UploadFields::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                if data.len() > max_upload_bytes {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "File size must be less than {max_upload_bytes} bytes"
                    ))));
                }
                fields.file = Some((data.to_vec(), content_type));
            }
            "title" => fields.title = Some(text_field(field).await?).filter(|s| !s.is_empty()),
            "description" => {
                fields.description = Some(text_field(field).await?).filter(|s| !s.is_empty())
            }
            "is_profile_photo" => fields.is_profile_photo = text_field(field).await? == "true",
            "is_public" => fields.is_public = text_field(field).await? != "false",
            "is_explicit" => fields.is_explicit = text_field(field).await? == "true",
            _ => {}
        }
    }

    Ok(fields)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {e}")))
}

/// API path clients use to fetch a stored object, built from its basename.
fn image_api_url(state: &AppState, object_key: &str) -> String {
    format!(
        "{}/api/v1/images/{}",
        state.config.public_base_url,
        basename(object_key)
    )
}

/// Remove both backing objects. Store failures are logged, not surfaced:
/// the row deletion must proceed so the record cannot be served again.
pub(crate) async fn delete_backing_objects(state: &AppState, media: &Media) {
    if let Err(e) = state.store.delete(&media.object_key).await {
        tracing::warn!(key = %media.object_key, error = %e, "Failed to delete object");
    }
    let thumbnail_key = thumbnail_key_for(&media.object_key);
    if let Err(e) = state.store.delete(&thumbnail_key).await {
        tracing::warn!(key = %thumbnail_key, error = %e, "Failed to delete thumbnail");
    }
}
