//! Dashboard theme editor.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::theme::{self, PRESETS, SiteTheme, ThemeColors, ThemePreset};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedTheme {
    #[serde(flatten)]
    pub theme: SiteTheme,
    pub warnings: Vec<&'static str>,
}

/// `PUT /api/admin/theme`: save and report readability warnings.
pub async fn save(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(colors): Json<ThemeColors>,
) -> Result<Json<SavedTheme>, ApiError> {
    let saved = theme::save_theme(&state.pool, &colors).await?;
    let warnings = saved.colors.contrast_warnings();
    tracing::info!(admin_id = %auth.admin.id, warnings = warnings.len(), "theme saved");
    Ok(Json(SavedTheme { theme: saved, warnings }))
}

/// `GET /api/admin/theme/presets`
pub async fn presets(_auth: AuthUser) -> Json<&'static [ThemePreset]> {
    Json(&PRESETS)
}
