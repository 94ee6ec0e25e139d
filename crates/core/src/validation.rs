//! Required-field checks shared by every create/update path.
//!
//! Request bodies model required fields as `Option<String>` so that an absent
//! field, a JSON `null` and a blank string are all reported the same way: as
//! a [`CoreError::Validation`] naming the field.

use crate::error::CoreError;

/// Return the trimmed value of a required field.
pub fn require_field<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Return the trimmed value of an optional field.
///
/// Absent is fine; present-but-blank is rejected because it would erase a
/// required attribute.
pub fn optional_field<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>, CoreError> {
    match value {
        None => Ok(None),
        Some(v) => require_field(field, Some(v)).map(Some),
    }
}

/// Password fields are required but never trimmed: leading and trailing
/// whitespace is part of the secret.
pub fn require_secret<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_trims() {
        assert_eq!(require_field("name", Some("  Leo ")).unwrap(), "Leo");
    }

    #[test]
    fn required_field_rejects_absent_and_blank() {
        for value in [None, Some(""), Some("   ")] {
            let err = require_field("name", value).unwrap_err();
            assert_eq!(err.to_string(), "Validation failed: name is required");
        }
    }

    #[test]
    fn optional_field_allows_absent() {
        assert_eq!(optional_field("species", None).unwrap(), None);
        assert_eq!(optional_field("species", Some("lion")).unwrap(), Some("lion"));
        assert!(optional_field("species", Some(" ")).is_err());
    }

    #[test]
    fn secret_keeps_whitespace() {
        assert_eq!(require_secret("password", Some(" pw ")).unwrap(), " pw ");
        assert!(require_secret("password", Some("")).is_err());
        assert!(require_secret("password", None).is_err());
    }
}
