//! Repository for the `media` table.

use sqlx::PgPool;
use talentdeck_core::types::DbId;

use crate::models::media::{CreateMedia, Media, PendingMedia, PublicMedia};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, object_key, url, thumbnail_url, mime_type, size_bytes, \
                        title, description, is_profile_photo, is_public, is_approved, \
                        is_explicit, view_count, created_at, updated_at";

/// Provides CRUD operations for uploaded media.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a new media row, returning it. New uploads are never approved.
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media (user_id, object_key, url, thumbnail_url, mime_type, size_bytes,
                                title, description, is_profile_photo, is_public, is_explicit)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(input.user_id)
            .bind(&input.object_key)
            .bind(&input.url)
            .bind(&input.thumbnail_url)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_profile_photo)
            .bind(input.is_public)
            .bind(input.is_explicit)
            .fetch_one(pool)
            .await
    }

    /// Find a media row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Locate a media row for a requested identifier.
    ///
    /// Matches, in one query: exact object key, object key ending with the
    /// identifier, or the identifier appearing inside the stored URL or
    /// thumbnail URL. The model enforces no uniqueness across these fields,
    /// so ties are possible; the most recently created row wins, which keeps
    /// resolution deterministic. The suffix/substring arms are a back-compat
    /// shim for keys written by older upload revisions -- new uploads always
    /// match on the exact basename of `object_key`.
    pub async fn find_by_requested_key(
        pool: &PgPool,
        requested: &str,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media
             WHERE object_key = $1
                OR object_key LIKE '%' || $1
                OR url LIKE '%' || $1 || '%'
                OR thumbnail_url LIKE '%' || $1 || '%'
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(requested)
            .fetch_optional(pool)
            .await
    }

    /// List all media owned by a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Approved + public media for a set of users, profile photos first.
    /// `per_user` caps the rows returned for each user (directory cards).
    pub async fn list_public_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
        per_user: i64,
    ) -> Result<Vec<PublicMedia>, sqlx::Error> {
        sqlx::query_as::<_, PublicMedia>(
            "SELECT id, user_id, url, thumbnail_url, is_profile_photo FROM (
                 SELECT m.id, m.user_id, m.url, m.thumbnail_url, m.is_profile_photo,
                        ROW_NUMBER() OVER (
                            PARTITION BY m.user_id
                            ORDER BY m.is_profile_photo DESC, m.created_at DESC
                        ) AS rn
                 FROM media m
                 WHERE m.user_id = ANY($1) AND m.is_approved AND m.is_public
             ) ranked
             WHERE rn <= $2
             ORDER BY user_id, rn",
        )
        .bind(user_ids)
        .bind(per_user)
        .fetch_all(pool)
        .await
    }

    /// Unapproved media joined with uploader usernames, newest first.
    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<PendingMedia>, sqlx::Error> {
        sqlx::query_as::<_, PendingMedia>(
            "SELECT m.id, m.user_id, u.username, m.url, m.thumbnail_url, m.mime_type, m.created_at
             FROM media m
             JOIN users u ON u.id = m.user_id
             WHERE NOT m.is_approved
             ORDER BY m.created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Number of unapproved media rows.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM media WHERE NOT is_approved")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Mark a single media row approved. Returns `true` if a row was updated.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE media SET is_approved = true, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Approve every media row belonging to a user (profile approval).
    pub async fn approve_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE media SET is_approved = true, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Set the public/private flag. Returns the updated row, or `None` if the
    /// row does not exist or is not owned by `user_id`.
    pub async fn set_visibility(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        is_public: bool,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET is_public = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(user_id)
            .bind(is_public)
            .fetch_optional(pool)
            .await
    }

    /// Designate a media row as the user's profile photo.
    ///
    /// Clears the flag on all of the user's other rows, then sets it on the
    /// target, inside one transaction. A partial unique index on
    /// `(user_id) WHERE is_profile_photo` backs the at-most-one invariant;
    /// two racing transactions serialize on it rather than both winning.
    /// Returns `false` if the target row does not exist or is not owned by
    /// `user_id` (the transaction rolls back).
    pub async fn set_profile_photo(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE media SET is_profile_photo = false, updated_at = now()
             WHERE user_id = $1 AND is_profile_photo",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE media SET is_profile_photo = true, updated_at = now()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Bump the view counter after a successful serve.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE media SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a media row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
