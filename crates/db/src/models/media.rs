//! Media entity model and DTOs.
//!
//! One row per uploaded asset. `object_key` is the canonical storage key
//! (`{user_id}/{uuid}.{ext}`); `url` and `thumbnail_url` are the API paths
//! handed to clients. Uploads start unapproved and become visible in the
//! public directory only after an administrator approves them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentdeck_core::types::{DbId, Timestamp};

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub user_id: DbId,
    pub object_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub mime_type: String,
    pub size_bytes: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_profile_photo: bool,
    pub is_public: bool,
    pub is_approved: bool,
    pub is_explicit: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new media row after a successful upload.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub user_id: DbId,
    pub object_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub mime_type: String,
    pub size_bytes: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_profile_photo: bool,
    pub is_public: bool,
    pub is_explicit: bool,
}

/// A pending (unapproved) media row joined with its uploader's username,
/// for the admin moderation queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingMedia {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub mime_type: String,
    pub created_at: Timestamp,
}

/// The slice of a media row embedded in public talent listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PublicMedia {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub is_profile_photo: bool,
}
