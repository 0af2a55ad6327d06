//! Repository for the `profiles` table.

use sqlx::PgPool;
use talentdeck_core::types::DbId;

use crate::models::profile::{PendingProfile, Profile, UpsertProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, stage_name, bio, age, city, state, height, hair_color, \
                        eye_color, ethnicity, body_type, tattoos, tattoos_description, \
                        piercings, piercings_description, orientation, job_types, availability, \
                        willing_to_travel, phone, instagram, twitter, website, is_verified, \
                        is_featured, created_at, updated_at";

/// Provides CRUD operations for talent profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a user's profile.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace a user's profile (PUT semantics). Verification and
    /// featuring flags are preserved across updates.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, stage_name, bio, age, city, state, height,
                                   hair_color, eye_color, ethnicity, body_type, tattoos,
                                   tattoos_description, piercings, piercings_description,
                                   orientation, job_types, availability, willing_to_travel,
                                   phone, instagram, twitter, website)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                     $17, $18, $19, $20, $21, $22, $23)
             ON CONFLICT (user_id) DO UPDATE SET
                 stage_name = EXCLUDED.stage_name,
                 bio = EXCLUDED.bio,
                 age = EXCLUDED.age,
                 city = EXCLUDED.city,
                 state = EXCLUDED.state,
                 height = EXCLUDED.height,
                 hair_color = EXCLUDED.hair_color,
                 eye_color = EXCLUDED.eye_color,
                 ethnicity = EXCLUDED.ethnicity,
                 body_type = EXCLUDED.body_type,
                 tattoos = EXCLUDED.tattoos,
                 tattoos_description = EXCLUDED.tattoos_description,
                 piercings = EXCLUDED.piercings,
                 piercings_description = EXCLUDED.piercings_description,
                 orientation = EXCLUDED.orientation,
                 job_types = EXCLUDED.job_types,
                 availability = EXCLUDED.availability,
                 willing_to_travel = EXCLUDED.willing_to_travel,
                 phone = EXCLUDED.phone,
                 instagram = EXCLUDED.instagram,
                 twitter = EXCLUDED.twitter,
                 website = EXCLUDED.website,
                 updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.stage_name)
            .bind(&input.bio)
            .bind(input.age)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.height)
            .bind(&input.hair_color)
            .bind(&input.eye_color)
            .bind(&input.ethnicity)
            .bind(&input.body_type)
            .bind(input.tattoos)
            .bind(&input.tattoos_description)
            .bind(input.piercings)
            .bind(&input.piercings_description)
            .bind(&input.orientation)
            .bind(&input.job_types)
            .bind(&input.availability)
            .bind(input.willing_to_travel)
            .bind(&input.phone)
            .bind(&input.instagram)
            .bind(&input.twitter)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Set the verification flag, creating an empty profile if none exists
    /// yet (admins can approve a user who never filled the form in).
    pub async fn set_verified(
        pool: &PgPool,
        user_id: DbId,
        verified: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO profiles (user_id, is_verified) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET is_verified = $2, updated_at = now()",
        )
        .bind(user_id)
        .bind(verified)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Talent users whose profile is unverified or missing, newest first,
    /// with their media counts -- the admin moderation queue.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingProfile>, sqlx::Error> {
        sqlx::query_as::<_, PendingProfile>(
            "SELECT u.id AS user_id, u.username, u.email,
                    (SELECT COUNT(*) FROM media m WHERE m.user_id = u.id) AS media_count,
                    u.created_at
             FROM users u
             JOIN roles r ON r.id = u.role_id
             LEFT JOIN profiles p ON p.user_id = u.id
             WHERE r.name = 'talent' AND (p.id IS NULL OR NOT p.is_verified)
             ORDER BY u.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of talent users with an unverified or missing profile.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM users u
             JOIN roles r ON r.id = u.role_id
             LEFT JOIN profiles p ON p.user_id = u.id
             WHERE r.name = 'talent' AND (p.id IS NULL OR NOT p.is_verified)",
        )
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Delete a user's profile. Returns `true` if a row was removed.
    pub async fn delete_by_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
