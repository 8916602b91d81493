//! Inbox routes for the dashboard, including the live event stream.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::message::{self, InboxEvent, Message, MessageStatus};
use crate::state::AppState;

const KEEP_ALIVE_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: MessageStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// `GET /api/admin/messages`
pub async fn list_messages(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(message::list_messages(&state.pool).await?))
}

/// `GET /api/admin/messages/unread`
pub async fn unread_count(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<serde_json::Value>, ApiError> {
    let count = message::count_unread(&state.pool).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

/// `PATCH /api/admin/messages/{id}`
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<StatusCode, ApiError> {
    message::set_status(&state.pool, id, body.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/admin/messages/{id}`
pub async fn delete_message(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    message::delete_message(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/messages/{id}/reply`
pub async fn reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReplyBody>,
) -> Result<Json<Message>, ApiError> {
    let replied =
        message::reply_to_message(&state.pool, state.mailer(), &state.config.owner_name, id, &body.reply).await?;
    tracing::info!(message_id = %id, admin_id = %auth.admin.id, "message replied");
    Ok(Json(replied))
}

/// `GET /api/admin/messages/events`: server-sent inbox events.
pub async fn events(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    Sse::new(inbox_stream(state.inbox.subscribe()))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECS)))
}

/// Turn a broadcast receiver into SSE events. A slow client that lags
/// behind skips the missed events; the next `new_message` still arrives.
pub(crate) fn inbox_stream(
    rx: broadcast::Receiver<InboxEvent>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = Event::default().event(event.name()).json_data(&event);
                    return Some((sse, rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "inbox stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
