//! Public routes: the site payload, project details, contact form and theme.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json};
use serde::Serialize;
use uuid::Uuid;

use super::error::ApiError;
use crate::rate_limit::client_key;
use crate::services::about::{self, About};
use crate::services::certificate::{self, Certificate};
use crate::services::message::{self, ContactInput};
use crate::services::offering::{self, Offering};
use crate::services::project::{self, Project};
use crate::services::skill::{self, Skill};
use crate::services::theme::{self, SiteTheme};
use crate::state::AppState;

/// Everything the home page renders, fetched in one request.
#[derive(Debug, Serialize)]
pub struct SitePayload {
    pub theme: SiteTheme,
    pub about: Option<About>,
    pub certificates: Vec<Certificate>,
    pub skills: Vec<Skill>,
    pub services: Vec<Offering>,
    pub projects: Vec<Project>,
}

/// `GET /api/site`
pub async fn site(State(state): State<AppState>) -> Result<Json<SitePayload>, ApiError> {
    let pool = &state.pool;
    let (theme, about, certificates, skills, services, projects) = tokio::try_join!(
        theme::get_theme(pool),
        about::get_about(pool),
        certificate::list_certificates(pool),
        skill::list_skills(pool),
        offering::list_offerings(pool),
        project::list_projects(pool),
    )?;
    Ok(Json(SitePayload { theme, about, certificates, skills, services, projects }))
}

/// `GET /api/projects/{id}`
pub async fn project_details(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Project>, ApiError> {
    Ok(Json(project::get_project(&state.pool, id).await?))
}

/// `POST /api/contact`: store the message, then notify the owner in the background.
pub async fn contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    state.contact_limiter.check_and_record(&client_key(&headers))?;

    let stored = message::submit_contact(&state.pool, &state.inbox, &input).await?;
    tracing::info!(message_id = %stored.id, "contact message received");

    if let (Some(mailer), Some(owner_email)) = (state.mailer.clone(), state.config.owner_email.clone()) {
        let stored = stored.clone();
        tokio::spawn(async move {
            if let Err(e) = message::notify_owner(mailer.as_ref(), &owner_email, &stored).await {
                tracing::warn!(error = %e, message_id = %stored.id, "owner notification failed");
            }
        });
    }

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": stored.id }))))
}

/// `GET /api/theme`
pub async fn theme_json(State(state): State<AppState>) -> Result<Json<SiteTheme>, ApiError> {
    Ok(Json(theme::get_theme(&state.pool).await?))
}

/// `GET /theme.css`: the saved colors as CSS variables.
///
/// Falls back to the default palette if the database is unreachable so the
/// site keeps its styling.
pub async fn theme_css(State(state): State<AppState>) -> impl IntoResponse {
    let colors = match theme::get_theme(&state.pool).await {
        Ok(saved) => saved.colors,
        Err(e) => {
            tracing::warn!(error = %e, "theme load failed; serving defaults");
            theme::ThemeColors::default()
        }
    };
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8"), (header::CACHE_CONTROL, "no-cache")],
        colors.to_css(),
    )
}
