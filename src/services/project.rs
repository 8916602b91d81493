//! Portfolio projects and their gallery ("sub") images.
//!
//! DESIGN
//! ======
//! A project owns a cover image plus an ordered gallery stored in
//! `project_images`. Creating or updating a project may append gallery images
//! in the same transaction; existing gallery images are only removed one at a
//! time. Deleting a project cascades to its gallery.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::content::{ContentError, clean, clean_opt, expect_affected};
use crate::validate::ValidationErrors;

const KIND: &str = "project";
const IMAGE_KIND: &str = "project image";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectImage {
    pub id: Uuid,
    pub image_url: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    long_description: Option<String>,
    link: String,
    image_url: String,
    created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub link: String,
    pub image_url: String,
    pub sub_images: Vec<ProjectImage>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Project {
    fn from_row(row: ProjectRow, sub_images: Vec<ProjectImage>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            long_description: row.long_description,
            link: row.link,
            image_url: row.image_url,
            sub_images,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    pub link: String,
    pub image_url: String,
    /// Gallery images to append.
    #[serde(default)]
    pub sub_images: Vec<String>,
}

impl ProjectInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("title", &self.title, 2, "العنوان يجب أن يكون حرفين على الأقل");
        errors.min_chars("description", &self.description, 10, "الوصف يجب أن يكون 10 أحرف على الأقل");
        if let Some(long) = clean_opt(self.long_description.as_deref()) {
            errors.min_chars("long_description", &long, 50, "الوصف الطويل يجب أن يكون 50 حرفاً على الأقل");
        }
        errors.url("link", &self.link, "الرجاء إدخال رابط صحيح");
        errors.image_ref("image_url", &self.image_url);
        let mut gallery = ValidationErrors::new();
        for url in &self.sub_images {
            gallery.image_ref("sub_images", url);
        }
        if let Some(msg) = gallery.get("sub_images") {
            errors.add("sub_images", msg);
        }
        errors.into_result()
    }
}

const COLUMNS: &str = "id, title, description, long_description, link, image_url, created_at";

/// List projects newest first, each with its gallery.
pub async fn list_projects(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProjectRow>(&format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"))
        .fetch_all(pool)
        .await?;
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut galleries = load_galleries(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let images = galleries.remove(&row.id).unwrap_or_default();
            Project::from_row(row, images)
        })
        .collect())
}

/// Fetch one project with its gallery.
pub async fn get_project(pool: &PgPool, id: Uuid) -> Result<Project, ContentError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!("SELECT {COLUMNS} FROM projects WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ContentError::not_found(KIND, id))?;
    let images = load_galleries(pool, &[id])
        .await?
        .remove(&id)
        .unwrap_or_default();
    Ok(Project::from_row(row, images))
}

pub async fn create_project(pool: &PgPool, input: &ProjectInput) -> Result<Project, ContentError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        "INSERT INTO projects (title, description, long_description, link, image_url)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(clean(&input.title))
    .bind(clean(&input.description))
    .bind(clean_opt(input.long_description.as_deref()))
    .bind(clean(&input.link))
    .bind(clean(&input.image_url))
    .fetch_one(&mut *tx)
    .await?;
    let images = append_images(&mut tx, row.id, &input.sub_images).await?;
    tx.commit().await?;

    Ok(Project::from_row(row, images))
}

/// Replace project fields and append any new gallery images.
pub async fn update_project(pool: &PgPool, id: Uuid, input: &ProjectInput) -> Result<Project, ContentError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    let updated = sqlx::query(
        "UPDATE projects
         SET title = $2, description = $3, long_description = $4, link = $5, image_url = $6
         WHERE id = $1",
    )
    .bind(id)
    .bind(clean(&input.title))
    .bind(clean(&input.description))
    .bind(clean_opt(input.long_description.as_deref()))
    .bind(clean(&input.link))
    .bind(clean(&input.image_url))
    .execute(&mut *tx)
    .await?;
    expect_affected(updated.rows_affected(), KIND, id)?;
    append_images(&mut tx, id, &input.sub_images).await?;
    tx.commit().await?;

    get_project(pool, id).await
}

pub async fn delete_project(pool: &PgPool, id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    expect_affected(result.rows_affected(), KIND, id)
}

/// Remove a single gallery image from a project.
pub async fn remove_project_image(pool: &PgPool, project_id: Uuid, image_id: Uuid) -> Result<(), ContentError> {
    let result = sqlx::query("DELETE FROM project_images WHERE id = $1 AND project_id = $2")
        .bind(image_id)
        .bind(project_id)
        .execute(pool)
        .await?;
    expect_affected(result.rows_affected(), IMAGE_KIND, image_id)
}

// =============================================================================
// GALLERY HELPERS
// =============================================================================

async fn append_images(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    urls: &[String],
) -> Result<Vec<ProjectImage>, sqlx::Error> {
    let mut images = Vec::with_capacity(urls.len());
    for url in urls {
        let image = sqlx::query_as::<_, ProjectImage>(
            "INSERT INTO project_images (project_id, image_url) VALUES ($1, $2)
             RETURNING id, image_url",
        )
        .bind(project_id)
        .bind(clean(url))
        .fetch_one(&mut **tx)
        .await?;
        images.push(image);
    }
    Ok(images)
}

async fn load_galleries(pool: &PgPool, project_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<ProjectImage>>, sqlx::Error> {
    if project_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, (Uuid, Uuid, String)>(
        "SELECT project_id, id, image_url
         FROM project_images
         WHERE project_id = ANY($1)
         ORDER BY position ASC",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await?;
    Ok(group_gallery_rows(rows))
}

fn group_gallery_rows(rows: Vec<(Uuid, Uuid, String)>) -> HashMap<Uuid, Vec<ProjectImage>> {
    let mut galleries: HashMap<Uuid, Vec<ProjectImage>> = HashMap::new();
    for (project_id, id, image_url) in rows {
        galleries
            .entry(project_id)
            .or_default()
            .push(ProjectImage { id, image_url });
    }
    galleries
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
