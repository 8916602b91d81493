//! Multipart image uploads into the storage buckets.

use axum::extract::{Multipart, Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::storage::{Bucket, Storage, StorageError};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct Uploaded {
    pub urls: Vec<String>,
}

/// `POST /api/admin/uploads/{bucket}`
///
/// Accepts one or more `file` parts and returns their public URLs in upload
/// order. A rejected part fails the request; parts already written stay on disk.
pub async fn upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(bucket): Path<String>,
    multipart: Multipart,
) -> Result<Json<Uploaded>, ApiError> {
    let urls = store_parts(&state.storage, bucket, multipart).await?;
    Ok(Json(Uploaded { urls }))
}

/// Write every `file` part into `bucket`, returning URLs in part order.
pub(crate) async fn store_parts(
    storage: &Storage,
    bucket: String,
    mut multipart: Multipart,
) -> Result<Vec<String>, ApiError> {
    let bucket = Bucket::parse(&bucket).ok_or(StorageError::UnknownBucket(bucket))?;

    let mut urls = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field.bytes().await?;

        let url = storage
            .store(bucket, file_name.as_deref(), &content_type, &bytes)
            .await?;
        urls.push(url);
    }

    if urls.is_empty() {
        return Err(StorageError::Empty.into());
    }
    Ok(urls)
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
