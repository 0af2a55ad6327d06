//! Read-side queries for the public talent directory.
//!
//! Only verified talent profiles with at least one approved, public media
//! row are listed. Filters use `($n IS NULL OR ...)` arms so one static
//! query covers every combination.

use sqlx::PgPool;
use talentdeck_core::types::DbId;

use crate::models::talent::{TalentFilter, TalentListing};

const LISTING_COLUMNS: &str = "u.id AS user_id, u.username, p.stage_name, p.bio, p.age, \
                                p.city, p.state, p.body_type, p.hair_color, p.eye_color, \
                                p.ethnicity, p.orientation, p.job_types, p.availability, \
                                p.willing_to_travel, p.is_featured, u.created_at";

/// Predicate shared by the listing and count queries.
const DIRECTORY_PREDICATE: &str = "r.name = 'talent'
    AND u.is_active
    AND p.is_verified
    AND EXISTS (
        SELECT 1 FROM media m
        WHERE m.user_id = u.id AND m.is_approved AND m.is_public
    )
    AND ($1::text IS NULL OR u.username ILIKE '%' || $1 || '%'
         OR p.stage_name ILIKE '%' || $1 || '%'
         OR p.bio ILIKE '%' || $1 || '%')
    AND ($2::text IS NULL OR p.city ILIKE '%' || $2 || '%')
    AND ($3::text IS NULL OR p.orientation = $3)
    AND ($4::text IS NULL OR p.body_type = $4)
    AND ($5::text IS NULL OR p.ethnicity = $5)
    AND ($6::int IS NULL OR p.age >= $6)
    AND ($7::int IS NULL OR p.age <= $7)";

/// Directory queries over users joined with profiles.
pub struct TalentRepo;

impl TalentRepo {
    /// List directory entries: featured first, then newest.
    pub async fn list(
        pool: &PgPool,
        filter: &TalentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TalentListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM users u
             JOIN roles r ON r.id = u.role_id
             JOIN profiles p ON p.user_id = u.id
             WHERE {DIRECTORY_PREDICATE}
             ORDER BY p.is_featured DESC, u.created_at DESC
             LIMIT $8 OFFSET $9"
        );
        sqlx::query_as::<_, TalentListing>(&query)
            .bind(&filter.q)
            .bind(&filter.city)
            .bind(&filter.orientation)
            .bind(&filter.body_type)
            .bind(&filter.ethnicity)
            .bind(filter.age_min)
            .bind(filter.age_max)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total directory entries matching the filter, for pagination.
    pub async fn count(pool: &PgPool, filter: &TalentFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)
             FROM users u
             JOIN roles r ON r.id = u.role_id
             JOIN profiles p ON p.user_id = u.id
             WHERE {DIRECTORY_PREDICATE}"
        );
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(&filter.q)
            .bind(&filter.city)
            .bind(&filter.orientation)
            .bind(&filter.body_type)
            .bind(&filter.ethnicity)
            .bind(filter.age_min)
            .bind(filter.age_max)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// A single public profile by username, if listed in the directory.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<TalentListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM users u
             JOIN roles r ON r.id = u.role_id
             JOIN profiles p ON p.user_id = u.id
             WHERE r.name = 'talent' AND u.is_active AND p.is_verified AND u.username = $1"
        );
        sqlx::query_as::<_, TalentListing>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Ids of the listed page's users, preserving listing order.
    pub fn user_ids(listings: &[TalentListing]) -> Vec<DbId> {
        listings.iter().map(|t| t.user_id).collect()
    }
}
