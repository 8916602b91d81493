//! Contact-form inbox.
//!
//! ARCHITECTURE
//! ============
//! Visitors submit messages through the public contact form. Each stored
//! message is announced on a `tokio::sync::broadcast` channel so open
//! dashboards can refresh without polling. The admin can mark messages read,
//! delete them, or reply by email; a successful reply flips the status to
//! `replied`.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::mailer::{MailError, Mailer, OutgoingEmail, templates};
use crate::validate::ValidationErrors;

pub const INBOX_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message not found: {0}")]
    NotFound(Uuid),
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("email delivery is not configured")]
    EmailDisabled,
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
}

impl MessageStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Self::New),
            "read" => Some(Self::Read),
            "replied" => Some(Self::Replied),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: MessageStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

type MessageRow = (Uuid, String, String, String, String, OffsetDateTime);

fn from_row((id, name, email, message, status, created_at): MessageRow) -> Message {
    Message {
        id,
        name,
        email,
        message,
        // The CHECK constraint keeps unknown values out of the table.
        status: MessageStatus::parse(&status).unwrap_or(MessageStatus::New),
        created_at,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("name", &self.name, 2, "الاسم يجب أن يكون حرفين على الأقل");
        errors.email("email", &self.email);
        errors.min_chars("message", &self.message, 10, "الرسالة يجب أن تكون 10 أحرف على الأقل");
        errors.into_result()
    }
}

/// Event pushed to dashboards watching the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboxEvent {
    NewMessage { id: Uuid, name: String },
}

impl InboxEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage { .. } => "new_message",
        }
    }
}

#[must_use]
pub fn inbox_channel() -> broadcast::Sender<InboxEvent> {
    broadcast::channel(INBOX_CHANNEL_CAPACITY).0
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Store a contact-form message and announce it.
pub async fn submit_contact(
    pool: &PgPool,
    inbox: &broadcast::Sender<InboxEvent>,
    input: &ContactInput,
) -> Result<Message, MessageError> {
    input.validate()?;

    let row = sqlx::query_as::<_, MessageRow>(
        "INSERT INTO messages (name, email, message) VALUES ($1, $2, $3)
         RETURNING id, name, email, message, status, created_at",
    )
    .bind(input.name.trim())
    .bind(input.email.trim().to_ascii_lowercase())
    .bind(input.message.trim())
    .fetch_one(pool)
    .await?;
    let message = from_row(row);

    // No receivers just means no dashboard is open.
    let _ = inbox.send(InboxEvent::NewMessage { id: message.id, name: message.name.clone() });
    Ok(message)
}

/// Notify the site owner about a new message. Best effort.
pub async fn notify_owner(mailer: &dyn Mailer, owner_email: &str, message: &Message) -> Result<(), MailError> {
    let email = OutgoingEmail {
        to: owner_email.to_owned(),
        subject: format!("رسالة جديدة من {}", message.name),
        html: templates::contact_notification(&message.name, &message.email, &message.message),
    };
    mailer.send(&email).await
}

pub async fn list_messages(pool: &PgPool) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MessageRow>(
        "SELECT id, name, email, message, status, created_at FROM messages ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(from_row).collect())
}

pub async fn count_unread(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE status = 'new'")
        .fetch_one(pool)
        .await
}

pub async fn get_message(pool: &PgPool, id: Uuid) -> Result<Message, MessageError> {
    sqlx::query_as::<_, MessageRow>("SELECT id, name, email, message, status, created_at FROM messages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(from_row)
        .ok_or(MessageError::NotFound(id))
}

pub async fn set_status(pool: &PgPool, id: Uuid, status: MessageStatus) -> Result<(), MessageError> {
    let result = sqlx::query("UPDATE messages SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(MessageError::NotFound(id));
    }
    Ok(())
}

pub async fn delete_message(pool: &PgPool, id: Uuid) -> Result<(), MessageError> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(MessageError::NotFound(id));
    }
    Ok(())
}

/// Email a reply to the sender, then mark the message replied.
///
/// The status is left untouched when delivery fails.
pub async fn reply_to_message(
    pool: &PgPool,
    mailer: Option<&dyn Mailer>,
    signature: &str,
    id: Uuid,
    reply: &str,
) -> Result<Message, MessageError> {
    let reply = reply.trim();
    if reply.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("reply", "الرجاء كتابة رد");
        return Err(errors.into());
    }
    let mailer = mailer.ok_or(MessageError::EmailDisabled)?;
    let original = get_message(pool, id).await?;

    let email = OutgoingEmail {
        to: original.email.clone(),
        subject: "رد على رسالتك".to_owned(),
        html: templates::reply(&original.name, reply, &original.message, signature),
    };
    mailer.send(&email).await?;
    set_status(pool, id, MessageStatus::Replied).await?;

    Ok(Message { status: MessageStatus::Replied, ..original })
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
