//! Admin session management.
//!
//! ARCHITECTURE
//! ============
//! Login issues an opaque random token stored in `sessions` with an absolute
//! expiry. The token travels only in an HttpOnly cookie; validation joins
//! back to `admins` so deleting an admin revokes their sessions.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Admin row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionAdmin {
    pub id: Uuid,
    pub email: String,
    /// Always `"admin"`; the dashboard has a single role.
    pub role: &'static str,
}

/// Create a session for the given admin, returning the token.
pub async fn create_session(pool: &PgPool, admin_id: Uuid, ttl_hours: i32) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO sessions (token, admin_id, expires_at)
         VALUES ($1, $2, now() + make_interval(hours => $3))",
    )
    .bind(&token)
    .bind(admin_id)
    .bind(ttl_hours)
    .execute(pool)
    .await?;
    Ok(token)
}

/// Validate a session token and return the associated admin.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionAdmin>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT a.id, a.email
          FROM sessions s
          JOIN admins a ON a.id = s.admin_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionAdmin { id: r.get("id"), email: r.get("email"), role: "admin" }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove expired sessions, returning how many were dropped.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
