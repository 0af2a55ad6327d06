//! Handlers for the `/messages` resource (internal member messaging).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use talentdeck_core::error::CoreError;
use talentdeck_core::types::DbId;
use talentdeck_db::models::message::{CreateMessage, Message, MessageWithNames};
use talentdeck_db::repositories::message_repo::Mailbox;
use talentdeck_db::repositories::{MessageRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /messages`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Mailbox to list: `inbox` (default), `sent`, or `archived`.
    #[serde(rename = "box")]
    pub mailbox: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Listing response with pagination and the inbox unread counter.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub data: Vec<MessageWithNames>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub unread_count: i64,
}

/// Request body for `POST /messages`. Exactly one of `receiver_id` /
/// `receiver_username` must identify the recipient.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub receiver_id: Option<DbId>,
    pub receiver_username: Option<String>,
    pub subject: Option<String>,
    pub body: String,
}

/// Request body for `PATCH /messages/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// One of `read`, `unread`, `archive`, `unarchive`.
    pub action: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/messages
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<MessageListResponse>> {
    let mailbox = match query.mailbox.as_deref() {
        None | Some("inbox") => Mailbox::Inbox,
        Some("sent") => Mailbox::Sent,
        Some("archived") => Mailbox::Archived,
        Some(other) => {
            return Err(AppError::BadRequest(format!("Unknown mailbox: {other}")));
        }
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;

    let messages =
        MessageRepo::list_mailbox(&state.pool, user.user_id, mailbox, per_page, offset).await?;
    let total = MessageRepo::count_mailbox(&state.pool, user.user_id, mailbox).await?;
    let unread_count = MessageRepo::unread_count(&state.pool, user.user_id).await?;

    let total_pages = (total + per_page - 1) / per_page;

    Ok(Json(MessageListResponse {
        data: messages,
        total,
        page,
        total_pages,
        unread_count,
    }))
}

/// POST /api/v1/messages
///
/// Send a message to another member, addressed by id or username.
pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SendRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message body is required".into(),
        )));
    }

    let receiver = match (input.receiver_id, input.receiver_username.as_deref()) {
        (Some(id), _) => UserRepo::find_by_id(&state.pool, id).await?,
        (None, Some(username)) => {
            UserRepo::find_by_username(&state.pool, &username.to_lowercase()).await?
        }
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "Receiver id or username is required".into(),
            )));
        }
    };

    let receiver =
        receiver.ok_or_else(|| AppError::NotFound("Receiver not found".into()))?;

    if receiver.id == user.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot send messages to yourself".into(),
        )));
    }

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            sender_id: user.user_id,
            receiver_id: receiver.id,
            subject: input.subject.filter(|s| !s.trim().is_empty()),
            body: input.body,
        },
    )
    .await?;

    tracing::info!(
        message_id = message.id,
        sender_id = user.user_id,
        receiver_id = receiver.id,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// PATCH /api/v1/messages/{id}
///
/// Mark read/unread or archive/unarchive. Receiver-only: senders cannot
/// mutate a delivered message's state.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRequest>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = MessageRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;

    if message.receiver_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the receiver can update a message".into(),
        )));
    }

    let updated = match input.action.as_str() {
        "read" => MessageRepo::set_read(&state.pool, id, user.user_id, true).await?,
        "unread" => MessageRepo::set_read(&state.pool, id, user.user_id, false).await?,
        "archive" => MessageRepo::set_archived(&state.pool, id, user.user_id, true).await?,
        "unarchive" => MessageRepo::set_archived(&state.pool, id, user.user_id, false).await?,
        other => {
            return Err(AppError::BadRequest(format!("Invalid action: {other}")));
        }
    };

    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }));
    }

    let message = MessageRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;

    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/messages/{id}
///
/// Either participant may delete a message from the thread.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MessageRepo::delete_for_user(&state.pool, id, user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))
    }
}
