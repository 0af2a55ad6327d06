//! Public talent-directory projections.

use serde::Serialize;
use sqlx::FromRow;
use talentdeck_core::types::{DbId, Timestamp};

/// A verified talent row for the public directory: user joined with profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentListing {
    pub user_id: DbId,
    pub username: String,
    pub stage_name: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub body_type: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub ethnicity: Option<String>,
    pub orientation: Option<String>,
    pub job_types: Vec<String>,
    pub availability: Option<String>,
    pub willing_to_travel: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
}

/// Directory search filters. All fields optional; `None` means "no filter".
#[derive(Debug, Clone, Default)]
pub struct TalentFilter {
    /// Substring match against username, stage name, or bio.
    pub q: Option<String>,
    pub city: Option<String>,
    pub orientation: Option<String>,
    pub body_type: Option<String>,
    pub ethnicity: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
}
