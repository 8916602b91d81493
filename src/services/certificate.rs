//! Certificates: CRUD for the credentials section of the site.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::content::{ContentError, clean, expect_affected};
use crate::validate::ValidationErrors;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const KIND: &str = "certificate";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub category: String,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificateInput {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub category: String,
    pub image_url: String,
}

impl CertificateInput {
    /// Validate and return the parsed award date.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<Date, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("title", &self.title, 2, "العنوان يجب أن يكون حرفين على الأقل");
        errors.min_chars("issuer", &self.issuer, 2, "الجهة المانحة يجب أن تكون حرفين على الأقل");
        let date = errors.date("date", &self.date);
        errors.required("category", &self.category, "الفئة مطلوبة");
        errors.image_ref("image_url", &self.image_url);
        errors.into_result()?;
        date.ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("date", "صيغة التاريخ غير صحيحة");
            errors
        })
    }
}

const COLUMNS: &str = "id, title, issuer, date, category, image_url, created_at";

/// List certificates, most recent award first.
pub async fn list_certificates(pool: &PgPool) -> Result<Vec<Certificate>, sqlx::Error> {
    sqlx::query_as::<_, Certificate>(&format!(
        "SELECT {COLUMNS} FROM certificates ORDER BY date DESC, created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn create_certificate(pool: &PgPool, input: &CertificateInput) -> Result<Certificate, ContentError> {
    let date = input.validate()?;
    let row = sqlx::query_as::<_, Certificate>(&format!(
        "INSERT INTO certificates (title, issuer, date, category, image_url)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(clean(&input.title))
    .bind(clean(&input.issuer))
    .bind(date)
    .bind(clean(&input.category))
    .bind(clean(&input.image_url))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_certificate(
    pool: &PgPool,
    id: Uuid,
    input: &CertificateInput,
) -> Result<Certificate, ContentError> {
    let date = input.validate()?;
    sqlx::query_as::<_, Certificate>(&format!(
        "UPDATE certificates
         SET title = $2, issuer = $3, date = $4, category = $5, image_url = $6
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(clean(&input.title))
    .bind(clean(&input.issuer))
    .bind(date)
    .bind(clean(&input.category))
    .bind(clean(&input.image_url))
    .fetch_optional(pool)
    .await?
    .ok_or(ContentError::not_found(KIND, id))
}

pub async fn delete_certificate(pool: &PgPool, id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    expect_affected(result.rows_affected(), KIND, id)
}
