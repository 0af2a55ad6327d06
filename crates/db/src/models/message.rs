//! Internal message model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use talentdeck_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

/// A message joined with sender and receiver usernames for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithNames {
    pub id: DbId,
    pub sender_id: DbId,
    pub sender_username: String,
    pub receiver_id: DbId,
    pub receiver_username: String,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new message.
pub struct CreateMessage {
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub subject: Option<String>,
    pub body: String,
}
