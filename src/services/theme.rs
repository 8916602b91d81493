//! Site color theme and its propagation as CSS custom properties.
//!
//! DESIGN
//! ======
//! One row (`id = 1`) holds three colors. Every page links `/theme.css`,
//! which renders them as `--primary-color`, `--secondary-color` and
//! `--text-color` on `:root`; stylesheets reference only the variables, so
//! saving a theme restyles the whole site and the dashboard at once.
//!
//! Saving also returns readability warnings computed with the WCAG 2 contrast
//! ratio. Warnings never block a save.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::validate::{ValidationErrors, is_hex_color};

pub const DEFAULT_PRIMARY: &str = "#2563eb";
pub const DEFAULT_SECONDARY: &str = "#4f46e5";
pub const DEFAULT_TEXT: &str = "#1f2937";

const MIN_TEXT_ON_WHITE_CONTRAST: f64 = 4.5;
const MIN_PRIMARY_SECONDARY_CONTRAST: f64 = 3.0;

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY.to_owned(),
            secondary_color: DEFAULT_SECONDARY.to_owned(),
            text_color: DEFAULT_TEXT.to_owned(),
        }
    }
}

impl ThemeColors {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.hex_color("primary_color", &self.primary_color);
        errors.hex_color("secondary_color", &self.secondary_color);
        errors.hex_color("text_color", &self.text_color);
        errors.into_result()
    }

    /// Lowercase `#rrggbb` form of every color.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            primary_color: normalize_hex(&self.primary_color),
            secondary_color: normalize_hex(&self.secondary_color),
            text_color: normalize_hex(&self.text_color),
        }
    }

    /// Stylesheet that publishes the theme as CSS variables.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            ":root {{\n  --primary-color: {};\n  --secondary-color: {};\n  --text-color: {};\n}}\n",
            css_safe(&self.primary_color, DEFAULT_PRIMARY),
            css_safe(&self.secondary_color, DEFAULT_SECONDARY),
            css_safe(&self.text_color, DEFAULT_TEXT),
        )
    }

    /// Readability warnings, in Arabic, for display in the dashboard.
    #[must_use]
    pub fn contrast_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if let Some(ratio) = contrast_ratio(&self.text_color, "#ffffff") {
            if ratio < MIN_TEXT_ON_WHITE_CONTRAST {
                warnings.push("نص غير واضح على الخلفية البيضاء");
            }
        }
        if let Some(ratio) = contrast_ratio(&self.primary_color, &self.secondary_color) {
            if ratio < MIN_PRIMARY_SECONDARY_CONTRAST {
                warnings.push("تناقض ضعيف بين الألوان الأساسية");
            }
        }
        warnings
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteTheme {
    #[serde(flatten)]
    pub colors: ThemeColors,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemePreset {
    pub name: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub text_color: &'static str,
}

pub const PRESETS: [ThemePreset; 3] = [
    ThemePreset { name: "أزرق كلاسيكي", primary_color: "#1350a3", secondary_color: "#08afee", text_color: "#1f2937" },
    ThemePreset { name: "أخضر طبيعي", primary_color: "#16a34a", secondary_color: "#15803d", text_color: "#1a2e05" },
    ThemePreset { name: "بنفسجي إبداعي", primary_color: "#9333ea", secondary_color: "#6b21a8", text_color: "#f3e8ff" },
];

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Load the theme, falling back to defaults when none was saved.
pub async fn get_theme(pool: &PgPool) -> Result<SiteTheme, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String, String, OffsetDateTime)>(
        "SELECT primary_color, secondary_color, text_color, updated_at FROM site_theme WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(match row {
        Some((primary_color, secondary_color, text_color, updated_at)) => SiteTheme {
            colors: ThemeColors { primary_color, secondary_color, text_color },
            updated_at: Some(updated_at),
        },
        None => SiteTheme { colors: ThemeColors::default(), updated_at: None },
    })
}

pub async fn save_theme(pool: &PgPool, colors: &ThemeColors) -> Result<SiteTheme, ThemeError> {
    colors.validate()?;
    let colors = colors.normalized();

    let updated_at: OffsetDateTime = sqlx::query_scalar(
        r"INSERT INTO site_theme (id, primary_color, secondary_color, text_color)
          VALUES (1, $1, $2, $3)
          ON CONFLICT (id) DO UPDATE SET
              primary_color = EXCLUDED.primary_color,
              secondary_color = EXCLUDED.secondary_color,
              text_color = EXCLUDED.text_color,
              updated_at = now()
          RETURNING updated_at",
    )
    .bind(&colors.primary_color)
    .bind(&colors.secondary_color)
    .bind(&colors.text_color)
    .fetch_one(pool)
    .await?;

    Ok(SiteTheme { colors, updated_at: Some(updated_at) })
}

// =============================================================================
// COLOR MATH
// =============================================================================

/// Expand `#rgb` to `#rrggbb` and lowercase. Non-colors pass through trimmed.
#[must_use]
pub fn normalize_hex(raw: &str) -> String {
    let raw = raw.trim();
    if !is_hex_color(raw) {
        return raw.to_owned();
    }
    let hex = &raw[1..];
    if hex.len() == 3 {
        let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
        format!("#{}", expanded.to_ascii_lowercase())
    } else {
        format!("#{}", hex.to_ascii_lowercase())
    }
}

fn css_safe<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if is_hex_color(value) { value.trim() } else { fallback }
}

fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    let normalized = normalize_hex(color);
    if !is_hex_color(&normalized) {
        return None;
    }
    let hex = &normalized[1..];
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn relative_luminance([r, g, b]: [u8; 3]) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.039_28 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two hex colors, in `1.0..=21.0`.
#[must_use]
pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let la = relative_luminance(parse_rgb(a)?);
    let lb = relative_luminance(parse_rgb(b)?);
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    Some((light + 0.05) / (dark + 0.05))
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
