//! Skills: short labelled badges with an image.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::content::{ContentError, clean, expect_affected};
use crate::validate::ValidationErrors;

const KIND: &str = "skill";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillInput {
    pub title: String,
    pub image_url: String,
}

impl SkillInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("title", &self.title, 2, "الاسم يجب أن يكون حرفين على الأقل");
        errors.image_ref("image_url", &self.image_url);
        errors.into_result()
    }
}

pub async fn list_skills(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>("SELECT id, title, image_url, created_at FROM skills ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create_skill(pool: &PgPool, input: &SkillInput) -> Result<Skill, ContentError> {
    input.validate()?;
    let row = sqlx::query_as::<_, Skill>(
        "INSERT INTO skills (title, image_url) VALUES ($1, $2)
         RETURNING id, title, image_url, created_at",
    )
    .bind(clean(&input.title))
    .bind(clean(&input.image_url))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_skill(pool: &PgPool, id: Uuid, input: &SkillInput) -> Result<Skill, ContentError> {
    input.validate()?;
    sqlx::query_as::<_, Skill>(
        "UPDATE skills SET title = $2, image_url = $3 WHERE id = $1
         RETURNING id, title, image_url, created_at",
    )
    .bind(id)
    .bind(clean(&input.title))
    .bind(clean(&input.image_url))
    .fetch_optional(pool)
    .await?
    .ok_or(ContentError::not_found(KIND, id))
}

pub async fn delete_skill(pool: &PgPool, id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    expect_affected(result.rows_affected(), KIND, id)
}
