//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a task title, matching the `tasks.title` column.
pub const MAX_TITLE_LENGTH: u64 = 255;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Normalizes an email for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
