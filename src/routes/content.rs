//! Dashboard CRUD for the site content tables.
//!
//! Every handler takes [`AuthUser`], so a missing or expired session is
//! rejected before any input is read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::about::{self, About, AboutInput};
use crate::services::certificate::{self, Certificate, CertificateInput};
use crate::services::offering::{self, Offering, OfferingInput};
use crate::services::project::{self, Project, ProjectInput};
use crate::services::skill::{self, Skill, SkillInput};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// ABOUT
// =============================================================================

pub async fn get_about(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Option<About>> {
    Ok(Json(about::get_about(&state.pool).await?))
}

pub async fn put_about(State(state): State<AppState>, auth: AuthUser, Json(input): Json<AboutInput>) -> ApiResult<About> {
    let saved = about::upsert_about(&state.pool, &input).await?;
    tracing::info!(admin_id = %auth.admin.id, "about profile saved");
    Ok(Json(saved))
}

// =============================================================================
// CERTIFICATES
// =============================================================================

pub async fn list_certificates(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Certificate>> {
    Ok(Json(certificate::list_certificates(&state.pool).await?))
}

pub async fn create_certificate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CertificateInput>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    let created = certificate::create_certificate(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_certificate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<CertificateInput>,
) -> ApiResult<Certificate> {
    Ok(Json(certificate::update_certificate(&state.pool, id, &input).await?))
}

pub async fn delete_certificate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    certificate::delete_certificate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// SKILLS
// =============================================================================

pub async fn list_skills(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Skill>> {
    Ok(Json(skill::list_skills(&state.pool).await?))
}

pub async fn create_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    Ok((StatusCode::CREATED, Json(skill::create_skill(&state.pool, &input).await?)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<SkillInput>,
) -> ApiResult<Skill> {
    Ok(Json(skill::update_skill(&state.pool, id, &input).await?))
}

pub async fn delete_skill(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    skill::delete_skill(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// SERVICES
// =============================================================================

pub async fn list_services(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Offering>> {
    Ok(Json(offering::list_offerings(&state.pool).await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<OfferingInput>,
) -> Result<(StatusCode, Json<Offering>), ApiError> {
    Ok((StatusCode::CREATED, Json(offering::create_offering(&state.pool, &input).await?)))
}

pub async fn update_service(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<OfferingInput>,
) -> ApiResult<Offering> {
    Ok(Json(offering::update_offering(&state.pool, id, &input).await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    offering::delete_offering(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// PROJECTS
// =============================================================================

pub async fn list_projects(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Project>> {
    Ok(Json(project::list_projects(&state.pool).await?))
}

pub async fn create_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let created = project::create_project(&state.pool, &input).await?;
    tracing::info!(project_id = %created.id, images = created.sub_images.len(), "project created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Gallery URLs in the body are appended to the existing gallery.
pub async fn update_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Project> {
    Ok(Json(project::update_project(&state.pool, id, &input).await?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    project::delete_project(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_project_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((project_id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    project::remove_project_image(&state.pool, project_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
