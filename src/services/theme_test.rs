use super::*;

fn colors(primary: &str, secondary: &str, text: &str) -> ThemeColors {
    ThemeColors { primary_color: primary.into(), secondary_color: secondary.into(), text_color: text.into() }
}

// =============================================================================
// contrast_ratio
// =============================================================================

#[test]
fn black_on_white_is_max_contrast() {
    let ratio = contrast_ratio("#000000", "#ffffff").unwrap();
    assert!((ratio - 21.0).abs() < 1e-9);
}

#[test]
fn identical_colors_have_unit_contrast() {
    let ratio = contrast_ratio("#2563eb", "#2563EB").unwrap();
    assert!((ratio - 1.0).abs() < 1e-9);
}

#[test]
fn contrast_is_symmetric() {
    let a = contrast_ratio("#1350a3", "#08afee").unwrap();
    let b = contrast_ratio("#08afee", "#1350a3").unwrap();
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn short_hex_matches_long_hex() {
    let short = contrast_ratio("#fff", "#000").unwrap();
    let long = contrast_ratio("#ffffff", "#000000").unwrap();
    assert!((short - long).abs() < 1e-12);
}

#[test]
fn contrast_of_invalid_color_is_none() {
    assert!(contrast_ratio("blue", "#ffffff").is_none());
}

// =============================================================================
// warnings
// =============================================================================

#[test]
fn default_text_is_readable_on_white() {
    let warnings = ThemeColors::default().contrast_warnings();
    assert!(!warnings.contains(&"نص غير واضح على الخلفية البيضاء"));
}

#[test]
fn dark_text_with_distinct_brand_colors_has_no_warnings() {
    assert!(colors("#1350a3", "#fde047", "#111827").contrast_warnings().is_empty());
}

#[test]
fn light_text_triggers_readability_warning() {
    // The "creative purple" preset uses a near-white text color.
    let theme = colors("#9333ea", "#6b21a8", "#f3e8ff");
    assert!(theme.contrast_warnings().contains(&"نص غير واضح على الخلفية البيضاء"));
}

#[test]
fn similar_brand_colors_trigger_warning() {
    let theme = colors("#16a34a", "#15803d", "#1a2e05");
    assert_eq!(theme.contrast_warnings(), vec!["تناقض ضعيف بين الألوان الأساسية"]);
}

// =============================================================================
// normalization / css
// =============================================================================

#[test]
fn normalize_expands_and_lowercases() {
    assert_eq!(normalize_hex(" #ABC "), "#aabbcc");
    assert_eq!(normalize_hex("#1F2937"), "#1f2937");
    assert_eq!(normalize_hex("red"), "red");
}

#[test]
fn css_publishes_all_three_variables() {
    let css = ThemeColors::default().to_css();
    assert!(css.starts_with(":root {"));
    assert!(css.contains("--primary-color: #2563eb;"));
    assert!(css.contains("--secondary-color: #4f46e5;"));
    assert!(css.contains("--text-color: #1f2937;"));
}

#[test]
fn css_never_emits_unsanitized_values() {
    let theme = colors("red;} body{display:none", "#123456", "#000");
    let css = theme.to_css();
    assert!(css.contains(&format!("--primary-color: {DEFAULT_PRIMARY};")));
    assert!(!css.contains("display:none"));
}

#[test]
fn validate_reports_each_bad_color() {
    let errors = colors("#12", "#zzzzzz", "black").validate().unwrap_err();
    assert_eq!(errors.len(), 3);
}

#[test]
fn site_theme_flattens_colors() {
    let theme = SiteTheme { colors: ThemeColors::default(), updated_at: None };
    let json = serde_json::to_value(&theme).unwrap();
    assert_eq!(json["primary_color"], DEFAULT_PRIMARY);
    assert!(json["updated_at"].is_null());
}

#[test]
fn presets_are_valid_colors() {
    for preset in &PRESETS {
        let theme = colors(preset.primary_color, preset.secondary_color, preset.text_color);
        assert!(theme.validate().is_ok(), "{} preset should validate", preset.name);
    }
}
