//! Auth routes: dashboard login, logout, current admin.

use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::error::ApiError;
use crate::rate_limit::client_key;
use crate::services::auth::{self as auth_svc, LoginInput};
use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

fn session_cookie(token: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated admin extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub admin: session::SessionAdmin,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let admin = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { admin, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: check credentials, set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<session::SessionAdmin>), ApiError> {
    let client = client_key(&headers);
    state.login_limiter.check_and_record(&client)?;

    let admin_id = match auth_svc::authenticate(&state.pool, &input).await {
        Ok(id) => id,
        Err(auth_svc::AuthError::InvalidCredentials) => {
            tracing::warn!(%client, "admin login rejected");
            return Err(auth_svc::AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };
    state.login_limiter.reset(&client);

    let ttl_hours = state.config.session_ttl_hours;
    let token = session::create_session(&state.pool, admin_id, ttl_hours).await?;
    let cookie = session_cookie(token, state.config.cookie_secure, Duration::hours(i64::from(ttl_hours)));

    tracing::info!(%admin_id, "admin logged in");
    let admin = session::SessionAdmin { id: admin_id, email: auth_svc::normalize_email(&input.email), role: "admin" };
    Ok((jar.add(cookie), Json(admin)))
}

/// `GET /api/auth/me`: return the current admin.
pub async fn me(auth: AuthUser) -> Json<session::SessionAdmin> {
    Json(auth.admin)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "session delete failed during logout");
    }

    let cookie = session_cookie(String::new(), state.config.cookie_secure, Duration::ZERO);
    (CookieJar::new().add(cookie), StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
