use axum::extract::FromRequestParts;
use axum::http::Request;

use super::*;
use crate::state::test_helpers::test_app_state;

async fn extract(request: Request<()>) -> Result<AuthUser, StatusCode> {
    let state = test_app_state();
    let (mut parts, ()) = request.into_parts();
    AuthUser::from_request_parts(&mut parts, &state).await
}

// =============================================================================
// session_cookie
// =============================================================================

#[test]
fn session_cookie_is_http_only_lax() {
    let cookie = session_cookie("abc".into(), true, Duration::hours(2));
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::hours(2)));
}

#[test]
fn clearing_cookie_expires_immediately() {
    let cookie = session_cookie(String::new(), false, Duration::ZERO);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(false));
}

// =============================================================================
// AuthUser extractor
// =============================================================================

#[tokio::test]
async fn missing_cookie_is_unauthorized() {
    let request = Request::builder().uri("/api/auth/me").body(()).unwrap();
    assert!(matches!(extract(request).await, Err(StatusCode::UNAUTHORIZED)));
}

#[tokio::test]
async fn empty_cookie_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("cookie", "session_token=")
        .body(())
        .unwrap();
    assert!(matches!(extract(request).await, Err(StatusCode::UNAUTHORIZED)));
}

#[tokio::test]
async fn unrelated_cookie_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/auth/me")
        .header("cookie", "theme=dark")
        .body(())
        .unwrap();
    assert!(matches!(extract(request).await, Err(StatusCode::UNAUTHORIZED)));
}
