//! Handlers for the `/admin` back-office: stats, moderation queues,
//! profile/media approval, user listing, and broadcast messaging.
//!
//! Every endpoint requires the admin role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use talentdeck_core::error::CoreError;
use talentdeck_core::roles::ROLE_PRODUCER;
use talentdeck_core::types::DbId;
use talentdeck_db::models::media::PendingMedia;
use talentdeck_db::models::profile::PendingProfile;
use talentdeck_db::models::user::UserWithRole;
use talentdeck_db::repositories::{MediaRepo, MessageRepo, ProfileRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::media::delete_backing_objects;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Cap on the pending-media moderation queue page.
const PENDING_MEDIA_LIMIT: i64 = 20;

const DEFAULT_USERS_PER_PAGE: i64 = 25;
const MAX_USERS_PER_PAGE: i64 = 100;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Dashboard counters for the admin landing page.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub pending_profiles: i64,
    pub pending_media: i64,
    pub active_producers: i64,
}

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request body for `POST /admin/broadcast`.
#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub subject: Option<String>,
    pub body: String,
    /// Restrict recipients to one role (`talent` or `producer`).
    pub target_role: Option<String>,
    /// Explicit recipient list; takes precedence over `target_role`.
    pub target_user_ids: Option<Vec<DbId>>,
}

/// Response body for `POST /admin/broadcast`.
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub messages_sent: u64,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminStats>>> {
    let total_users = UserRepo::count(&state.pool).await?;
    let pending_profiles = ProfileRepo::count_pending(&state.pool).await?;
    let pending_media = MediaRepo::count_pending(&state.pool).await?;
    let active_producers = UserRepo::count_by_role(&state.pool, ROLE_PRODUCER).await?;

    Ok(Json(DataResponse {
        data: AdminStats {
            total_users,
            pending_profiles,
            pending_media,
            active_producers,
        },
    }))
}

// ---------------------------------------------------------------------------
// Profile moderation
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/pending-profiles
pub async fn pending_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingProfile>>>> {
    let profiles = ProfileRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// POST /api/v1/admin/profiles/{user_id}/approve
///
/// Verify the profile (creating one if the user never filled the form in)
/// and approve all of that user's media in the same action.
pub async fn approve_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    ProfileRepo::set_verified(&state.pool, user.id, true).await?;
    let approved = MediaRepo::approve_all_for_user(&state.pool, user.id).await?;

    tracing::info!(
        user_id,
        admin_id = admin.user_id,
        media_approved = approved,
        "Profile approved"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/profiles/{user_id}/reject
pub async fn reject_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    ProfileRepo::set_verified(&state.pool, user.id, false).await?;

    tracing::info!(user_id, admin_id = admin.user_id, "Profile rejected");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Media moderation
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/pending-media
pub async fn pending_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingMedia>>>> {
    let media = MediaRepo::list_pending(&state.pool, PENDING_MEDIA_LIMIT).await?;
    Ok(Json(DataResponse { data: media }))
}

/// POST /api/v1/admin/media/{id}/approve
pub async fn approve_media(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let approved = MediaRepo::approve(&state.pool, id).await?;
    if !approved {
        return Err(AppError::Core(CoreError::NotFound { entity: "Media", id }));
    }

    tracing::info!(media_id = id, admin_id = admin.user_id, "Media approved");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/media/{id}/reject
///
/// Rejection removes the record and both backing objects; there is no
/// rejected-but-kept state.
pub async fn reject_media(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Media", id }))?;

    delete_backing_objects(&state, &media).await;
    MediaRepo::delete(&state.pool, id).await?;

    tracing::info!(media_id = id, admin_id = admin.user_id, "Media rejected");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> AppResult<Json<PageResponse<UserWithRole>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_USERS_PER_PAGE)
        .clamp(1, MAX_USERS_PER_PAGE);
    let offset = (page - 1) * per_page;

    let users = UserRepo::list_with_roles(&state.pool, per_page, offset).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(PageResponse::new(users, total, page, per_page)))
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/broadcast
///
/// Send one message to many members: everyone, one role, or an explicit id
/// list. The sending admin is never a recipient.
pub async fn broadcast(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BroadcastRequest>,
) -> AppResult<Json<DataResponse<BroadcastResponse>>> {
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message body is required".into(),
        )));
    }

    let recipients: Vec<DbId> = match &input.target_user_ids {
        Some(ids) if !ids.is_empty() => ids
            .iter()
            .copied()
            .filter(|id| *id != admin.user_id)
            .collect(),
        _ => {
            UserRepo::list_ids_excluding(&state.pool, admin.user_id, input.target_role.as_deref())
                .await?
        }
    };

    if recipients.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No recipients found".into(),
        )));
    }

    let subject = input.subject.as_deref().unwrap_or("System Message");
    let sent =
        MessageRepo::create_many(&state.pool, admin.user_id, &recipients, Some(subject), &input.body)
            .await?;

    tracing::info!(
        admin_id = admin.user_id,
        recipients = recipients.len(),
        "Broadcast sent"
    );

    Ok(Json(DataResponse {
        data: BroadcastResponse {
            messages_sent: sent,
        },
    }))
}
