//! JSON error responses.
//!
//! Every fallible handler returns `Result<_, ApiError>`. The body is always
//! `{ "error": "..." }`, plus `"fields"` for validation failures so the
//! dashboard forms can show messages next to each input.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::rate_limit::RateLimitExceeded;
use crate::services::auth::AuthError;
use crate::services::content::ContentError;
use crate::services::mailer::MailError;
use crate::services::message::MessageError;
use crate::services::storage::StorageError;
use crate::services::support::SupportError;
use crate::services::theme::ThemeError;
use crate::validate::ValidationErrors;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<ValidationErrors>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), fields: None }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn invalid(fields: ValidationErrors) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: "validation failed".into(), fields: Some(fields) }
    }

    /// Log the cause and hide it from the client.
    #[must_use]
    pub fn internal(error: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %error, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }

    #[must_use]
    pub fn email_disabled() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "email delivery is not configured")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "error": self.message, "fields": fields }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::invalid(errors)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::internal(&e)
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::NotFound { kind, .. } => Self::new(StatusCode::NOT_FOUND, format!("{kind} not found")),
            ContentError::Invalid(fields) => Self::invalid(fields),
            ContentError::Database(e) => Self::internal(&e),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(e: MailError) -> Self {
        tracing::warn!(error = %e, "email delivery failed");
        Self::new(StatusCode::BAD_GATEWAY, "email delivery failed")
    }
}

impl From<MessageError> for ApiError {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "message not found"),
            MessageError::Invalid(fields) => Self::invalid(fields),
            MessageError::EmailDisabled => Self::email_disabled(),
            MessageError::Mail(e) => e.into(),
            MessageError::Database(e) => Self::internal(&e),
        }
    }
}

impl From<ThemeError> for ApiError {
    fn from(e: ThemeError) -> Self {
        match e {
            ThemeError::Invalid(fields) => Self::invalid(fields),
            ThemeError::Database(e) => Self::internal(&e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnknownBucket(bucket) => Self::bad_request(format!("unknown bucket: {bucket}")),
            StorageError::NotAnImage(_) => Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, "only image files are allowed"),
            StorageError::TooLarge { limit, .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, format!("file exceeds {limit} bytes"))
            }
            StorageError::Empty => Self::bad_request("no file in upload"),
            StorageError::Io(e) => Self::internal(&e),
        }
    }
}

/// Keeps axum's status, so a body over `DefaultBodyLimit` stays 413.
impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        let status = e.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(status, "upload exceeds the size limit");
        }
        Self::new(status, format!("invalid multipart body: {}", e.body_text()))
    }
}

impl From<SupportError> for ApiError {
    fn from(e: SupportError) -> Self {
        match e {
            SupportError::Invalid(fields) => Self::invalid(fields),
            SupportError::EmailDisabled => Self::email_disabled(),
            SupportError::Mail(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::new(StatusCode::UNAUTHORIZED, "invalid credentials"),
            AuthError::Invalid(fields) => Self::invalid(fields),
            AuthError::Hash(e) => Self::internal(&e),
            AuthError::Db(e) => Self::internal(&e),
        }
    }
}

impl From<RateLimitExceeded> for ApiError {
    fn from(e: RateLimitExceeded) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, e.to_string())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
