//! Support requests from the dashboard.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::support::{self, SupportInput};
use crate::state::AppState;

/// `POST /api/admin/support`
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SupportInput>,
) -> Result<StatusCode, ApiError> {
    support::send_support_request(state.mailer(), state.config.support_email.as_deref(), &input).await?;
    tracing::info!(admin_id = %auth.admin.id, "support request sent");
    Ok(StatusCode::ACCEPTED)
}
