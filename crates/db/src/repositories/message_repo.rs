//! Repository for the `messages` table.

use sqlx::PgPool;
use talentdeck_core::types::DbId;

use crate::models::message::{CreateMessage, Message, MessageWithNames};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, sender_id, receiver_id, subject, body, is_read, is_archived, created_at";

/// Which mailbox a listing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mailbox {
    Inbox,
    Sent,
    Archived,
}

/// Columns for listings joined with usernames.
const NAMED_COLUMNS: &str = "m.id, m.sender_id, s.username AS sender_username, \
                              m.receiver_id, r.username AS receiver_username, \
                              m.subject, m.body, m.is_read, m.is_archived, m.created_at";

/// Provides CRUD operations for internal messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a new message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (sender_id, receiver_id, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .bind(&input.subject)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Insert one message per receiver in a single statement (broadcast).
    /// Returns the number of messages created.
    pub async fn create_many(
        pool: &PgPool,
        sender_id: DbId,
        receiver_ids: &[DbId],
        subject: Option<&str>,
        body: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, subject, body)
             SELECT $1, t.receiver_id, $3, $4 FROM UNNEST($2::bigint[]) AS t(receiver_id)",
        )
        .bind(sender_id)
        .bind(receiver_ids)
        .bind(subject)
        .bind(body)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a message visible to the given user (as sender or receiver).
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a mailbox for a user, newest first, paginated.
    pub async fn list_mailbox(
        pool: &PgPool,
        user_id: DbId,
        mailbox: Mailbox,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageWithNames>, sqlx::Error> {
        let query = format!(
            "SELECT {NAMED_COLUMNS}
             FROM messages m
             JOIN users s ON s.id = m.sender_id
             JOIN users r ON r.id = m.receiver_id
             WHERE {}
             ORDER BY m.created_at DESC
             LIMIT $2 OFFSET $3",
            Self::mailbox_predicate(mailbox)
        );
        sqlx::query_as::<_, MessageWithNames>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of messages in a mailbox.
    pub async fn count_mailbox(
        pool: &PgPool,
        user_id: DbId,
        mailbox: Mailbox,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM messages m WHERE {}",
            Self::mailbox_predicate(mailbox)
        );
        let (count,): (i64,) = sqlx::query_as(&query).bind(user_id).fetch_one(pool).await?;
        Ok(count)
    }

    /// Unread, unarchived messages in the user's inbox.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages
             WHERE receiver_id = $1 AND NOT is_read AND NOT is_archived",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Set the read flag on a message the user received.
    pub async fn set_read(
        pool: &PgPool,
        id: DbId,
        receiver_id: DbId,
        is_read: bool,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE messages SET is_read = $3 WHERE id = $1 AND receiver_id = $2")
                .bind(id)
                .bind(receiver_id)
                .bind(is_read)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the archived flag on a message the user received.
    pub async fn set_archived(
        pool: &PgPool,
        id: DbId,
        receiver_id: DbId,
        is_archived: bool,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE messages SET is_archived = $3 WHERE id = $1 AND receiver_id = $2")
                .bind(id)
                .bind(receiver_id)
                .bind(is_archived)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a message the user sent or received. Returns `true` if removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM messages WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    fn mailbox_predicate(mailbox: Mailbox) -> &'static str {
        match mailbox {
            Mailbox::Inbox => "m.receiver_id = $1 AND NOT m.is_archived",
            Mailbox::Sent => "m.sender_id = $1",
            Mailbox::Archived => "m.receiver_id = $1 AND m.is_archived",
        }
    }
}
