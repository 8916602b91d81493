//! Form validation for public and dashboard payloads.
//!
//! Every check records a `field -> message` pair instead of returning early,
//! so a form gets all of its complaints in one response. Messages are in
//! Arabic because they are shown verbatim next to the offending input.

use serde::Serialize;
use serde::ser::SerializeMap;
use time::Date;
use time::macros::format_description;

/// Ordered collection of per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Only the first message per field is kept.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.fields.push((field, message.into()));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, msg)| msg.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// At least `min` characters after trimming. Counts chars, not bytes.
    pub fn min_chars(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.add(field, message);
        }
    }

    pub fn required(&mut self, field: &'static str, value: &str, message: &str) {
        self.min_chars(field, value, 1, message);
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !is_email(value) {
            self.add(field, "البريد الإلكتروني غير صالح");
        }
    }

    pub fn url(&mut self, field: &'static str, value: &str, message: &str) {
        if !is_http_url(value) {
            self.add(field, message);
        }
    }

    /// Accepts either an absolute http(s) URL or a path into local storage.
    pub fn image_ref(&mut self, field: &'static str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, "الصورة مطلوبة");
        } else if !(is_http_url(value) || is_storage_path(value)) {
            self.add(field, "رابط الصورة غير صالح");
        }
    }

    pub fn hex_color(&mut self, field: &'static str, value: &str) {
        if !is_hex_color(value) {
            self.add(field, "لون غير صالح، استخدم صيغة #rrggbb");
        }
    }

    /// Parses `YYYY-MM-DD`, returning the date when valid.
    pub fn date(&mut self, field: &'static str, value: &str) -> Option<Date> {
        let value = value.trim();
        if value.is_empty() {
            self.add(field, "التاريخ مطلوب");
            return None;
        }
        let parsed = parse_date(value);
        if parsed.is_none() {
            self.add(field, "صيغة التاريخ غير صحيحة");
        }
        parsed
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|(name, _)| *name).collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, message) in &self.fields {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

// =============================================================================
// PREDICATES
// =============================================================================

#[must_use]
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

#[must_use]
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !value.chars().any(char::is_whitespace)
}

#[must_use]
pub fn is_storage_path(value: &str) -> bool {
    value
        .strip_prefix("/storage/")
        .is_some_and(|rest| !rest.is_empty() && !rest.split('/').any(|seg| seg == ".." || seg.is_empty()))
}

#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.trim().strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[must_use]
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
