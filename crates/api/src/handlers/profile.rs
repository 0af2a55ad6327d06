//! Handlers for the `/profile` resource (the caller's own talent profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use talentdeck_db::models::profile::{Profile, UpsertProfile};
use talentdeck_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// The caller's profile, or `null` if none has been created yet.
pub async fn get_own(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Option<Profile>>>> {
    let profile = ProfileRepo::find_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Create or replace the caller's profile. Absent fields clear stored
/// values; verification and featuring flags are untouched (admin-only).
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpsertProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::upsert(&state.pool, user.user_id, &input).await?;
    tracing::info!(user_id = user.user_id, "Profile updated");
    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /api/v1/profile
///
/// Remove the caller's profile row. 204 whether or not one existed.
pub async fn delete(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    ProfileRepo::delete_by_user(&state.pool, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
