//! Singleton profile shown in the site's hero and "about" sections.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use super::content::{ContentError, clean};
use crate::validate::ValidationErrors;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct About {
    pub name: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub projects_count: i32,
    pub hours_experience: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutInput {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub projects_count: i32,
    #[serde(default)]
    pub hours_experience: i32,
}

impl AboutInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("name", &self.name, 2, "الاسم يجب أن يكون حرفين على الأقل");
        if !self.image_url.trim().is_empty() {
            errors.image_ref("image_url", &self.image_url);
        }
        if self.projects_count < 0 {
            errors.add("projects_count", "القيمة يجب ألا تكون سالبة");
        }
        if self.hours_experience < 0 {
            errors.add("hours_experience", "القيمة يجب ألا تكون سالبة");
        }
        errors.into_result()
    }
}

/// Fetch the profile, `None` until the admin saves it once.
pub async fn get_about(pool: &PgPool) -> Result<Option<About>, sqlx::Error> {
    sqlx::query_as::<_, About>(
        "SELECT name, title, description, image_url, projects_count, hours_experience, updated_at
         FROM about WHERE id = 1",
    )
    .fetch_optional(pool)
    .await
}

/// Create or replace the profile row.
pub async fn upsert_about(pool: &PgPool, input: &AboutInput) -> Result<About, ContentError> {
    input.validate()?;

    let row = sqlx::query_as::<_, About>(
        r"INSERT INTO about (id, name, title, description, image_url, projects_count, hours_experience)
          VALUES (1, $1, $2, $3, $4, $5, $6)
          ON CONFLICT (id) DO UPDATE SET
              name = EXCLUDED.name,
              title = EXCLUDED.title,
              description = EXCLUDED.description,
              image_url = EXCLUDED.image_url,
              projects_count = EXCLUDED.projects_count,
              hours_experience = EXCLUDED.hours_experience,
              updated_at = now()
          RETURNING name, title, description, image_url, projects_count, hours_experience, updated_at",
    )
    .bind(clean(&input.name))
    .bind(clean(&input.title))
    .bind(clean(&input.description))
    .bind(clean(&input.image_url))
    .bind(input.projects_count)
    .bind(input.hours_experience)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
