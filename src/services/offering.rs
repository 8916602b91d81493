//! Offered treatments ("services" on the site).
//!
//! The icon is either a URL to an uploaded image or an inline icon name /
//! SVG snippet typed into the dashboard.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::content::{ContentError, clean, expect_affected};
use crate::validate::ValidationErrors;

const KIND: &str = "service";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Offering {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferingInput {
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl OfferingInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("title", &self.title, 2, "العنوان يجب أن يكون حرفين على الأقل");
        errors.min_chars("description", &self.description, 10, "الوصف يجب أن يكون 10 أحرف على الأقل");
        errors.min_chars("icon", &self.icon, 2, "الرجاء إدخال رمز الأيقونة أو رفع ملف");
        errors.into_result()
    }
}

pub async fn list_offerings(pool: &PgPool) -> Result<Vec<Offering>, sqlx::Error> {
    sqlx::query_as::<_, Offering>(
        "SELECT id, title, description, icon, created_at FROM services ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create_offering(pool: &PgPool, input: &OfferingInput) -> Result<Offering, ContentError> {
    input.validate()?;
    let row = sqlx::query_as::<_, Offering>(
        "INSERT INTO services (title, description, icon) VALUES ($1, $2, $3)
         RETURNING id, title, description, icon, created_at",
    )
    .bind(clean(&input.title))
    .bind(clean(&input.description))
    .bind(clean(&input.icon))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_offering(pool: &PgPool, id: Uuid, input: &OfferingInput) -> Result<Offering, ContentError> {
    input.validate()?;
    sqlx::query_as::<_, Offering>(
        "UPDATE services SET title = $2, description = $3, icon = $4 WHERE id = $1
         RETURNING id, title, description, icon, created_at",
    )
    .bind(id)
    .bind(clean(&input.title))
    .bind(clean(&input.description))
    .bind(clean(&input.icon))
    .fetch_optional(pool)
    .await?
    .ok_or(ContentError::not_found(KIND, id))
}

pub async fn delete_offering(pool: &PgPool, id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    expect_affected(result.rows_affected(), KIND, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_needs_ten_chars() {
        let input = OfferingInput { title: "تبييض".into(), description: "قصير".into(), icon: "tooth".into() };
        let errors = input.validate().unwrap_err();
        assert!(errors.get("description").is_some());
        assert!(errors.get("title").is_none());
    }

    #[test]
    fn icon_may_be_name_or_url() {
        for icon in ["sparkles", "/storage/service_icons/icon.svg", "<svg viewBox=\"0 0 1 1\"/>"] {
            let input = OfferingInput {
                title: "تبييض الأسنان".into(),
                description: "جلسة تبييض احترافية بالليزر".into(),
                icon: icon.into(),
            };
            assert!(input.validate().is_ok(), "{icon} should be accepted");
        }
    }
}
