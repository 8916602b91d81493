use super::*;

#[test]
fn empty_errors_are_ok() {
    let errors = ValidationErrors::new();
    assert!(errors.is_empty());
    assert!(errors.into_result().is_ok());
}

#[test]
fn first_message_per_field_wins() {
    let mut errors = ValidationErrors::new();
    errors.add("title", "first");
    errors.add("title", "second");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("title"), Some("first"));
}

#[test]
fn min_chars_counts_arabic_characters_not_bytes() {
    let mut errors = ValidationErrors::new();
    // Two Arabic letters are four bytes but two characters.
    errors.min_chars("name", "بك", 2, "too short");
    assert!(errors.is_empty());
    errors.min_chars("name", " ب ", 2, "too short");
    assert_eq!(errors.get("name"), Some("too short"));
}

#[test]
fn serializes_as_field_map() {
    let mut errors = ValidationErrors::new();
    errors.add("email", "bad");
    errors.add("message", "short");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({"email": "bad", "message": "short"}));
}

#[test]
fn display_lists_field_names() {
    let mut errors = ValidationErrors::new();
    errors.add("a", "x");
    errors.add("b", "y");
    assert_eq!(errors.to_string(), "invalid fields: a, b");
}

#[test]
fn email_predicate() {
    assert!(is_email("patient@example.com"));
    assert!(is_email("  dr.smile@clinic.co.uk "));
    assert!(!is_email(""));
    assert!(!is_email("patient"));
    assert!(!is_email("@example.com"));
    assert!(!is_email("a@b@c.com"));
    assert!(!is_email("a@localhost"));
    assert!(!is_email("a b@example.com"));
    assert!(!is_email("a@example."));
}

#[test]
fn url_predicate() {
    assert!(is_http_url("https://example.com"));
    assert!(is_http_url("http://example.com/path?q=1"));
    assert!(!is_http_url("ftp://example.com"));
    assert!(!is_http_url("https://"));
    assert!(!is_http_url("example.com"));
    assert!(!is_http_url("https://exa mple.com"));
}

#[test]
fn storage_path_predicate() {
    assert!(is_storage_path("/storage/project_images/a.png"));
    assert!(!is_storage_path("/storage/"));
    assert!(!is_storage_path("/storage/../etc/passwd"));
    assert!(!is_storage_path("/uploads/a.png"));
}

#[test]
fn image_ref_accepts_url_or_storage_path() {
    let mut errors = ValidationErrors::new();
    errors.image_ref("a", "https://cdn.example.com/x.png");
    errors.image_ref("b", "/storage/skills_images/x.png");
    assert!(errors.is_empty());

    errors.image_ref("c", "");
    errors.image_ref("d", "not a url");
    assert_eq!(errors.get("c"), Some("الصورة مطلوبة"));
    assert_eq!(errors.get("d"), Some("رابط الصورة غير صالح"));
}

#[test]
fn hex_color_predicate() {
    assert!(is_hex_color("#2563eb"));
    assert!(is_hex_color("#FFF"));
    assert!(!is_hex_color("2563eb"));
    assert!(!is_hex_color("#2563e"));
    assert!(!is_hex_color("#zzzzzz"));
    assert!(!is_hex_color("#2563ebff"));
}

#[test]
fn date_rule_parses_iso_dates() {
    let mut errors = ValidationErrors::new();
    let date = errors.date("date", "2024-03-15");
    assert!(errors.is_empty());
    let date = date.unwrap();
    assert_eq!(date.year(), 2024);
    assert_eq!(u8::from(date.month()), 3);
    assert_eq!(date.day(), 15);

    assert!(errors.date("missing", " ").is_none());
    assert!(errors.date("garbled", "15/03/2024").is_none());
    assert_eq!(errors.get("missing"), Some("التاريخ مطلوب"));
    assert_eq!(errors.get("garbled"), Some("صيغة التاريخ غير صحيحة"));
}
