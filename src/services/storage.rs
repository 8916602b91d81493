//! Image buckets on local disk.
//!
//! DESIGN
//! ======
//! Each bucket is a directory under `UPLOAD_DIR`, served read-only at
//! `/storage/{bucket}/...`. Stored names are `{prefix}-{unix_millis}-{random}.{ext}`
//! so concurrent uploads of the same file never collide and the original
//! name never reaches the filesystem beyond an allowlisted image extension.

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;
use time::OffsetDateTime;

const RANDOM_SUFFIX_LEN: usize = 8;
/// Extensions kept from client file names. `/storage` serves by extension.
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"];

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),
    #[error("not an image: {0}")]
    NotAnImage(String),
    #[error("file too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("no file in upload")]
    Empty,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    About,
    Certificates,
    Skills,
    ServiceIcons,
    Projects,
}

impl Bucket {
    pub const ALL: [Self; 5] = [Self::About, Self::Certificates, Self::Skills, Self::ServiceIcons, Self::Projects];

    /// Directory and URL segment. The mixed separators are historical and
    /// existing image URLs depend on them.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::About => "about-images",
            Self::Certificates => "certificate_images",
            Self::Skills => "skills_images",
            Self::ServiceIcons => "service_icons",
            Self::Projects => "project_images",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == raw)
    }

    /// File name prefix for objects in this bucket.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Certificates => "certificate",
            Self::Skills => "skill",
            Self::ServiceIcons => "service",
            Self::Projects => "project",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl Storage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str, max_bytes: usize) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.trim_end_matches('/').to_owned(), max_bytes }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create every bucket directory.
    pub async fn ensure_buckets(&self) -> Result<(), StorageError> {
        for bucket in Bucket::ALL {
            tokio::fs::create_dir_all(self.root.join(bucket.as_str())).await?;
        }
        Ok(())
    }

    /// Reject anything that is not an image within the size limit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotAnImage`] or [`StorageError::TooLarge`].
    pub fn check(&self, content_type: &str, size: usize) -> Result<(), StorageError> {
        if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(StorageError::NotAnImage(content_type.to_owned()));
        }
        if size == 0 {
            return Err(StorageError::Empty);
        }
        if size > self.max_bytes {
            return Err(StorageError::TooLarge { size, limit: self.max_bytes });
        }
        Ok(())
    }

    /// Write one upload and return its public URL.
    pub async fn store(
        &self,
        bucket: Bucket,
        file_name: Option<&str>,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        self.check(content_type, bytes.len())?;

        let object = object_name(bucket, file_name, content_type);
        let dir = self.root.join(bucket.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&object), bytes).await?;

        tracing::info!(bucket = bucket.as_str(), %object, size = bytes.len(), "image stored");
        Ok(self.public_url(bucket, &object))
    }

    #[must_use]
    pub fn public_url(&self, bucket: Bucket, object: &str) -> String {
        format!("{}/storage/{}/{object}", self.public_base_url, bucket.as_str())
    }
}

/// Build `{prefix}-{unix_millis}-{random}.{ext}`.
#[must_use]
pub fn object_name(bucket: Bucket, file_name: Option<&str>, content_type: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    let ext = file_name
        .and_then(sanitize_extension)
        .unwrap_or_else(|| extension_for_content_type(content_type));
    format!("{}-{millis}-{suffix}.{ext}", bucket.prefix())
}

/// Lowercased extension of a client-supplied file name, if it names an image
/// format. Anything else falls back to the content type.
#[must_use]
pub fn sanitize_extension(file_name: &str) -> Option<&'static str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.into_iter().find(|allowed| *allowed == ext)
}

#[must_use]
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => "jpg",
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
