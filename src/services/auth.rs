//! Admin accounts: password hashing and credential checks.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::validate::{ValidationErrors, is_email};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

fn engine() -> Result<Argon2<'static>, AuthError> {
    // 19 MiB, 2 passes, 1 lane: the OWASP baseline for Argon2id.
    let params = Params::new(19 * 1024, 2, 1, None).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if the salt or hash cannot be produced.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hash(e.to_string()))?;
    let hash = engine()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    match engine()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(e.to_string())),
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.email("email", &self.email);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "كلمة المرور يجب أن تكون 6 أحرف على الأقل");
        }
        errors.into_result()
    }
}

#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Check credentials, returning the admin id.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(pool: &PgPool, input: &LoginInput) -> Result<Uuid, AuthError> {
    input.validate()?;

    let row = sqlx::query("SELECT id, password_hash FROM admins WHERE email = $1")
        .bind(normalize_email(&input.email))
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Err(AuthError::InvalidCredentials);
    };

    let stored: String = row.get("password_hash");
    if verify_password(&input.password, &stored)? {
        Ok(row.get("id"))
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Create the admin or reset its password. Used for startup bootstrap.
pub async fn upsert_admin(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, AuthError> {
    let email = normalize_email(email);
    if !is_email(&email) {
        let mut errors = ValidationErrors::new();
        errors.email("email", &email);
        return Err(errors.into());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        let mut errors = ValidationErrors::new();
        errors.add("password", "كلمة المرور يجب أن تكون 6 أحرف على الأقل");
        return Err(errors.into());
    }
    let password_hash = hash_password(password)?;

    let row = sqlx::query(
        r"INSERT INTO admins (email, password_hash)
          VALUES ($1, $2)
          ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
          RETURNING id",
    )
    .bind(&email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
