use super::*;

fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dentfolio-storage-{tag}-{}", uuid::Uuid::new_v4()))
}

// =============================================================================
// Bucket
// =============================================================================

#[test]
fn bucket_names_round_trip() {
    for bucket in Bucket::ALL {
        assert_eq!(Bucket::parse(bucket.as_str()), Some(bucket));
    }
}

#[test]
fn unknown_bucket_is_none() {
    assert_eq!(Bucket::parse("avatars"), None);
    assert_eq!(Bucket::parse("../about-images"), None);
}

// =============================================================================
// names
// =============================================================================

#[test]
fn object_name_shape() {
    let name = object_name(Bucket::Certificates, Some("Diploma.PNG"), "image/png");
    let parts: Vec<&str> = name.splitn(3, '-').collect();
    assert_eq!(parts[0], "certificate");
    assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
    let (random, ext) = parts[2].split_once('.').unwrap();
    assert_eq!(random.len(), RANDOM_SUFFIX_LEN);
    assert_eq!(ext, "png");
}

#[test]
fn object_names_differ() {
    let a = object_name(Bucket::Skills, Some("a.jpg"), "image/jpeg");
    let b = object_name(Bucket::Skills, Some("a.jpg"), "image/jpeg");
    assert_ne!(a, b);
}

#[test]
fn extension_falls_back_to_content_type() {
    let name = object_name(Bucket::Projects, Some("no-extension"), "image/webp");
    assert!(name.ends_with(".webp"));
    let name = object_name(Bucket::Projects, None, "image/heic");
    assert!(name.ends_with(".jpg"));
}

#[test]
fn sanitize_extension_rejects_path_tricks() {
    assert_eq!(sanitize_extension("photo.JPEG"), Some("jpeg"));
    assert_eq!(sanitize_extension(".bashrc"), None);
    assert_eq!(sanitize_extension("x.p/ng"), None);
    assert_eq!(sanitize_extension("x.longextension"), None);
    assert_eq!(sanitize_extension("x."), None);
}

#[test]
fn sanitize_extension_keeps_only_image_formats() {
    for ext in ["png", "jpg", "jpeg", "gif", "webp", "avif", "svg"] {
        assert_eq!(sanitize_extension(&format!("a.{ext}")), Some(ext));
    }
    assert_eq!(sanitize_extension("evil.html"), None);
    assert_eq!(sanitize_extension("evil.htm"), None);
    assert_eq!(sanitize_extension("evil.js"), None);
    assert_eq!(sanitize_extension("photo.png.html"), None);
}

#[test]
fn script_extension_falls_back_to_content_type() {
    let name = object_name(Bucket::Projects, Some("evil.html"), "image/png");
    assert!(name.ends_with(".png"), "{name}");
    let name = object_name(Bucket::About, Some("page.xhtml"), "image/gif");
    assert!(name.ends_with(".gif"), "{name}");
}

// =============================================================================
// check / store
// =============================================================================

#[test]
fn check_rejects_non_images_and_oversize() {
    let storage = Storage::new("/tmp/unused", "", 10);
    assert!(matches!(storage.check("application/pdf", 5), Err(StorageError::NotAnImage(_))));
    assert!(matches!(storage.check("image/png", 11), Err(StorageError::TooLarge { size: 11, limit: 10 })));
    assert!(matches!(storage.check("image/png", 0), Err(StorageError::Empty)));
    assert!(storage.check("IMAGE/PNG", 10).is_ok());
}

#[test]
fn public_url_joins_base() {
    let storage = Storage::new("/tmp/unused", "https://clinic.example/", 10);
    assert_eq!(
        storage.public_url(Bucket::About, "about-1-abc.png"),
        "https://clinic.example/storage/about-images/about-1-abc.png"
    );
    let relative = Storage::new("/tmp/unused", "", 10);
    assert_eq!(relative.public_url(Bucket::Skills, "s.png"), "/storage/skills_images/s.png");
}

#[tokio::test]
async fn store_writes_file_under_bucket() {
    let root = temp_root("store");
    let storage = Storage::new(&root, "", 1024);

    let url = storage.store(Bucket::ServiceIcons, Some("tooth.svg"), "image/svg+xml", b"<svg/>").await.unwrap();
    assert!(url.starts_with("/storage/service_icons/service-"));
    assert!(url.ends_with(".svg"));

    let object = url.rsplit('/').next().unwrap();
    let written = tokio::fs::read(root.join("service_icons").join(object)).await.unwrap();
    assert_eq!(written, b"<svg/>");

    tokio::fs::remove_dir_all(&root).await.unwrap();
}

#[tokio::test]
async fn ensure_buckets_creates_every_directory() {
    let root = temp_root("ensure");
    let storage = Storage::new(&root, "", 1024);
    storage.ensure_buckets().await.unwrap();
    for bucket in Bucket::ALL {
        assert!(root.join(bucket.as_str()).is_dir());
    }
    tokio::fs::remove_dir_all(&root).await.unwrap();
}
