//! Shared error type for the dashboard-managed content tables.

use uuid::Uuid;

use crate::validate::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ContentError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Map a `rows_affected` count to `NotFound` when nothing matched.
pub(crate) fn expect_affected(rows: u64, kind: &'static str, id: Uuid) -> Result<(), ContentError> {
    if rows == 0 { Err(ContentError::not_found(kind, id)) } else { Ok(()) }
}

/// Trim a required text field for storage.
pub(crate) fn clean(value: &str) -> String {
    value.trim().to_owned()
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn clean_opt(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_affected_maps_zero_to_not_found() {
        let err = expect_affected(0, "skill", Uuid::nil()).unwrap_err();
        assert!(matches!(err, ContentError::NotFound { kind: "skill", .. }));
        assert!(expect_affected(1, "skill", Uuid::nil()).is_ok());
    }

    #[test]
    fn clean_opt_drops_blank() {
        assert_eq!(clean_opt(Some("  ")), None);
        assert_eq!(clean_opt(None), None);
        assert_eq!(clean_opt(Some(" text ")), Some("text".to_owned()));
    }

    #[test]
    fn not_found_message_names_kind() {
        let err = ContentError::not_found("project", Uuid::nil());
        assert_eq!(err.to_string(), format!("project not found: {}", Uuid::nil()));
    }
}
