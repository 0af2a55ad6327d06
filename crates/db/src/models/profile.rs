//! Talent profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentdeck_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub stage_name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub height: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub ethnicity: Option<String>,
    pub body_type: Option<String>,
    pub tattoos: bool,
    pub tattoos_description: Option<String>,
    pub piercings: bool,
    pub piercings_description: Option<String>,
    pub orientation: Option<String>,
    pub job_types: Vec<String>,
    pub availability: Option<String>,
    pub willing_to_travel: bool,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a user's profile (PUT semantics: absent
/// fields clear the stored value). Verification and featuring are admin
/// concerns and deliberately not part of this DTO.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertProfile {
    pub stage_name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub height: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub ethnicity: Option<String>,
    pub body_type: Option<String>,
    #[serde(default)]
    pub tattoos: bool,
    pub tattoos_description: Option<String>,
    #[serde(default)]
    pub piercings: bool,
    pub piercings_description: Option<String>,
    pub orientation: Option<String>,
    #[serde(default)]
    pub job_types: Vec<String>,
    pub availability: Option<String>,
    #[serde(default)]
    pub willing_to_travel: bool,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// An unverified talent joined with counts, for the admin moderation queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingProfile {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub media_count: i64,
    pub created_at: Timestamp,
}
