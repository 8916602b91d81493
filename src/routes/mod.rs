//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the JSON API, the uploaded images under
//! `/storage`, the generated `/theme.css`, and the static site build from
//! `SITE_DIR` as the fallback. Admin routes live under `/api/admin` and
//! each handler requires an [`auth::AuthUser`].

pub mod auth;
pub mod content;
pub mod error;
pub mod messages;
pub mod public;
pub mod support;
pub mod theme;
pub mod uploads;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode, header};
use axum::routing::{delete, get, patch, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Uploaded SVGs may carry script. Opened directly they must not run it.
const STORAGE_CSP: &str = "default-src 'none'; img-src 'self'; style-src 'unsafe-inline'; sandbox";

/// Upper bound on files in one upload request.
const MAX_FILES_PER_UPLOAD: usize = 10;

/// Public and admin JSON routes.
fn api_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.max_upload_bytes.saturating_mul(MAX_FILES_PER_UPLOAD);

    Router::new()
        // public
        .route("/api/site", get(public::site))
        .route("/api/projects/{id}", get(public::project_details))
        .route("/api/contact", post(public::contact))
        .route("/api/theme", get(public::theme_json))
        .route("/theme.css", get(public::theme_css))
        // auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        // admin content
        .route("/api/admin/about", get(content::get_about).put(content::put_about))
        .route(
            "/api/admin/certificates",
            get(content::list_certificates).post(content::create_certificate),
        )
        .route(
            "/api/admin/certificates/{id}",
            put(content::update_certificate).delete(content::delete_certificate),
        )
        .route("/api/admin/skills", get(content::list_skills).post(content::create_skill))
        .route("/api/admin/skills/{id}", put(content::update_skill).delete(content::delete_skill))
        .route("/api/admin/services", get(content::list_services).post(content::create_service))
        .route(
            "/api/admin/services/{id}",
            put(content::update_service).delete(content::delete_service),
        )
        .route("/api/admin/projects", get(content::list_projects).post(content::create_project))
        .route(
            "/api/admin/projects/{id}",
            put(content::update_project).delete(content::delete_project),
        )
        .route(
            "/api/admin/projects/{id}/images/{image_id}",
            delete(content::delete_project_image),
        )
        // admin inbox
        .route("/api/admin/messages", get(messages::list_messages))
        .route("/api/admin/messages/unread", get(messages::unread_count))
        .route("/api/admin/messages/events", get(messages::events))
        .route(
            "/api/admin/messages/{id}",
            patch(messages::update_status).delete(messages::delete_message),
        )
        .route("/api/admin/messages/{id}/reply", post(messages::reply))
        // admin misc
        .route("/api/admin/theme", put(theme::save))
        .route("/api/admin/theme/presets", get(theme::presets))
        .route(
            "/api/admin/uploads/{bucket}",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/admin/support", post(support::submit))
        .route("/healthz", get(healthz))
}

/// Full application: API, uploaded images, static site fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let site_dir = state.config.site_dir.clone();
    let site_service = ServeDir::new(&site_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(site_dir.join("index.html")));
    let storage_service = Router::new()
        .fallback_service(ServeDir::new(state.storage.root()))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(STORAGE_CSP),
        ));

    api_routes(&state)
        .nest_service("/storage", storage_service)
        .fallback_service(site_service)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
