//! Runtime configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds one `AppConfig`. Optional
//! integrations (email delivery, bootstrap admin) are `None` when their
//! variables are missing so the site still boots in a bare environment.

use std::ops::RangeInclusive;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_SESSION_TTL_HOURS: i32 = 24 * 7;
/// One year. Longer sessions are a misconfiguration.
pub const MAX_SESSION_TTL_HOURS: i32 = 24 * 365;
pub const DEFAULT_OWNER_NAME: &str = "Dr.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials for the transactional email provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
}

/// Admin account upserted at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub site_dir: PathBuf,
    /// Prefix for storage URLs. Empty means root-relative (`/storage/...`).
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i32,
    pub cookie_secure: bool,
    pub email: Option<EmailConfig>,
    /// Inbox that receives contact-form notifications.
    pub owner_email: Option<String>,
    /// Signature used on replies.
    pub owner_name: String,
    /// Mailbox for dashboard support requests. Falls back to `owner_email`.
    pub support_email: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT` (default 3000), `DB_MAX_CONNECTIONS` (default 5)
    /// - `UPLOAD_DIR` (default `./uploads`), `SITE_DIR` (default `./site`)
    /// - `PUBLIC_BASE_URL`, `MAX_UPLOAD_BYTES`
/// - `SESSION_TTL_HOURS` (default 168, at most one year)
    /// - `COOKIE_SECURE`
    /// - `RESEND_API_KEY` + `RESEND_FROM` enable email delivery
    /// - `OWNER_EMAIL`, `OWNER_NAME`, `SUPPORT_EMAIL`
    /// - `ADMIN_EMAIL` + `ADMIN_PASSWORD` bootstrap the admin account
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty_var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let email = match (non_empty_var("RESEND_API_KEY"), non_empty_var("RESEND_FROM")) {
            (Some(api_key), Some(from)) => Some(EmailConfig { api_key, from }),
            _ => None,
        };
        let bootstrap_admin = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };
        let owner_email = non_empty_var("OWNER_EMAIL");

        Ok(Self {
            database_url,
            db_max_connections: env_parse_strict("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            port: env_parse_strict("PORT", DEFAULT_PORT)?,
            upload_dir: non_empty_var("UPLOAD_DIR").map_or_else(|| PathBuf::from("./uploads"), PathBuf::from),
            site_dir: non_empty_var("SITE_DIR").map_or_else(|| PathBuf::from("./site"), PathBuf::from),
            public_base_url: non_empty_var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
            max_upload_bytes: env_parse_strict("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            session_ttl_hours: env_parse_in_range(
                "SESSION_TTL_HOURS",
                DEFAULT_SESSION_TTL_HOURS,
                1..=MAX_SESSION_TTL_HOURS,
            )?,
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            email,
            support_email: non_empty_var("SUPPORT_EMAIL").or_else(|| owner_email.clone()),
            owner_email,
            owner_name: non_empty_var("OWNER_NAME").unwrap_or_else(|| DEFAULT_OWNER_NAME.to_owned()),
            bootstrap_admin,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Parse an env var, falling back to `default` when unset or unparsable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Like [`env_parse`], but a present-and-garbled value is an error.
fn env_parse_strict<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Copy,
{
    match non_empty_var(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Like [`env_parse_strict`], but the value must also fall inside `range`.
fn env_parse_in_range<T>(key: &'static str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Copy + PartialOrd + std::fmt::Display,
{
    let value = env_parse_strict(key, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid { key, value: value.to_string() });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
