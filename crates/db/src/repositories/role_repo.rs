//! Repository for the `roles` table.

use sqlx::PgPool;
use talentdeck_core::types::DbId;

/// Lookups against the seeded roles table.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name. Errors with `RowNotFound` if the id
    /// does not exist (roles are seed data; a miss is a data bug).
    pub async fn resolve_name(pool: &PgPool, id: DbId) -> Result<String, sqlx::Error> {
        let (name,): (String,) = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(name)
    }

    /// Find a role id by name.
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}
