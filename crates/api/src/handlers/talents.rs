//! Handlers for the public `/talents` directory.
//!
//! Only verified talent profiles with at least one approved, public media
//! row are listed. Listings embed up to [`MEDIA_PER_CARD`] media entries,
//! profile photo first.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use talentdeck_core::types::DbId;
use talentdeck_db::models::media::PublicMedia;
use talentdeck_db::models::talent::{TalentFilter, TalentListing};
use talentdeck_db::repositories::{MediaRepo, TalentRepo};

use crate::error::{AppError, AppResult};
use crate::response::PageResponse;
use crate::state::AppState;

/// Media entries embedded per directory card.
const MEDIA_PER_CARD: i64 = 5;

/// Media entries returned on a full profile page.
const MEDIA_PER_PROFILE: i64 = 50;

const DEFAULT_PER_PAGE: i64 = 12;
const MAX_PER_PAGE: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /talents`.
#[derive(Debug, Default, Deserialize)]
pub struct TalentQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub city: Option<String>,
    pub orientation: Option<String>,
    pub body_type: Option<String>,
    pub ethnicity: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
}

/// A directory entry with its embedded media.
#[derive(Debug, Serialize)]
pub struct TalentCard {
    #[serde(flatten)]
    pub listing: TalentListing,
    pub media: Vec<PublicMedia>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/talents
///
/// Paginated public directory: featured first, then newest. All filters
/// are optional query parameters.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TalentQuery>,
) -> AppResult<Json<PageResponse<TalentCard>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;

    let filter = TalentFilter {
        q: query.q.filter(|s| !s.is_empty()),
        city: query.city.filter(|s| !s.is_empty()),
        orientation: query.orientation.filter(|s| !s.is_empty()),
        body_type: query.body_type.filter(|s| !s.is_empty()),
        ethnicity: query.ethnicity.filter(|s| !s.is_empty()),
        age_min: query.age_min,
        age_max: query.age_max,
    };

    let listings = TalentRepo::list(&state.pool, &filter, per_page, offset).await?;
    let total = TalentRepo::count(&state.pool, &filter).await?;

    let cards = attach_media(&state, listings, MEDIA_PER_CARD).await?;

    Ok(Json(PageResponse::new(cards, total, page, per_page)))
}

/// GET /api/v1/talents/{username}
///
/// A single public profile with its approved, public media.
pub async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<TalentCard>> {
    let listing = TalentRepo::find_by_username(&state.pool, &username.to_lowercase())
        .await?
        .ok_or_else(|| AppError::NotFound("Talent not found".into()))?;

    let mut cards = attach_media(&state, vec![listing], MEDIA_PER_PROFILE).await?;
    // attach_media preserves its input; one listing in, one card out.
    cards
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::InternalError("talent card construction failed".into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load approved+public media for the listed users and zip them onto cards.
async fn attach_media(
    state: &AppState,
    listings: Vec<TalentListing>,
    per_user: i64,
) -> AppResult<Vec<TalentCard>> {
    let user_ids = TalentRepo::user_ids(&listings);
    let media = MediaRepo::list_public_for_users(&state.pool, &user_ids, per_user).await?;

    let mut by_user: HashMap<DbId, Vec<PublicMedia>> = HashMap::new();
    for item in media {
        by_user.entry(item.user_id).or_default().push(item);
    }

    Ok(listings
        .into_iter()
        .map(|listing| {
            let media = by_user.remove(&listing.user_id).unwrap_or_default();
            TalentCard { listing, media }
        })
        .collect())
}
